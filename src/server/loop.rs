// Server loop module
// Binds the listener and accepts connections until a shutdown signal arrives

use std::sync::Arc;

use super::connection::handle_connection;
use super::listener::create_reusable_listener;
use super::signal::shutdown_signal;
use crate::config::{AppState, Config};
use crate::logger;

/// Run the server until Ctrl-C or SIGTERM
///
/// Connections already accepted keep running on their own tasks; the loop
/// only stops taking new ones.
///
/// # Errors
///
/// Fails when the address is invalid, the document root does not exist or
/// the listener cannot be bound.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.socket_addr()?;
    let state = Arc::new(AppState::new(config)?);
    let listener = create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &state.config, &state.root);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = &mut shutdown => {
                logger::log_server_stop();
                break;
            }
        }
    }

    Ok(())
}
