// Application state module
// Read-only state shared by every request for the lifetime of the process

use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical document root; every served path must stay below it
    pub root: PathBuf,
    /// Lowercased referer hostnames allowed to embed images
    pub whitelist: HashSet<String>,
}

impl AppState {
    /// Build the state from a loaded configuration
    ///
    /// Fails when the document root does not exist.
    pub fn new(config: Config) -> io::Result<Self> {
        let root = std::fs::canonicalize(&config.site.root)?;
        let whitelist = config
            .site
            .whitelist
            .iter()
            .map(|host| host.trim().to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();

        Ok(Self {
            config,
            root,
            whitelist,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canonicalizes_root_and_whitelist() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.site.root = dir.path().to_string_lossy().into_owned();
        config.site.whitelist = vec![" CDN.Example.com ".to_string(), String::new()];

        let state = AppState::new(config).unwrap();
        assert_eq!(state.root, dir.path().canonicalize().unwrap());
        assert_eq!(state.whitelist.len(), 1);
        assert!(state.whitelist.contains("cdn.example.com"));
    }

    #[test]
    fn test_new_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.site.root = dir.path().join("nope").to_string_lossy().into_owned();

        assert!(AppState::new(config).is_err());
    }
}
