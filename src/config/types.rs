// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads, one per CPU core when unset
    #[serde(default)]
    pub workers: Option<usize>,
}

/// What is served and how it may be cached or embedded
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Document root
    pub root: String,
    /// Hostnames allowed to embed images besides the server's own host
    #[serde(default)]
    pub whitelist: Vec<String>,
    /// Seconds a client may reuse a response without revalidating
    #[serde(default = "default_max_age")]
    pub max_age: u32,
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_age() -> u32 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: None,
            },
            site: SiteConfig {
                root: "public".to_string(),
                whitelist: Vec::new(),
                max_age: default_max_age(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                access_log: true,
                access_log_format: default_access_log_format(),
            },
        }
    }
}
