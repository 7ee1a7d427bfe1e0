//! Logger module
//!
//! Thin facade over `tracing` for the HTTP server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Target of access log events, filterable with `RUST_LOG=access=off`
pub const ACCESS_TARGET: &str = "access";

/// Initialize the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` takes precedence
/// over `logging.level`.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init()?;
    Ok(())
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, root: &std::path::Path) {
    tracing::info!("======================================");
    tracing::info!("Static server started successfully");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Document root: {}", root.display());
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if !config.site.whitelist.is_empty() {
        tracing::info!("Referer whitelist: {}", config.site.whitelist.join(", "));
    }
    tracing::info!("Cache max-age: {}s", config.site.max_age);
    tracing::info!("======================================");
}

pub fn log_server_stop() {
    tracing::info!("Shutdown signal received, no longer accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("[WARN] {message}");
}

pub fn log_hotlink_blocked(path: &str, referer: &str) {
    tracing::warn!("[Hotlink] Blocked {path} referred by {referer}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
