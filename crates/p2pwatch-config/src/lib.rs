//! p2pwatch configuration system.
//!
//! TOML-based configuration with validation. All sections use defaults so
//! partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use p2pwatch_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("{}", config.server.state_url());
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    DisplayConfig, LogLevel, LoggingConfig, ServerConfig, StreamConfig, WatchConfig,
};

use std::path::Path;

use p2pwatch_common::ConfigError;

/// Load config from `path`, or from the platform default path when `None`.
///
/// The default path is created with commented defaults if missing; an
/// explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<WatchConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nshow_addresses = false\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(!config.display.show_addresses);
    }

    #[test]
    fn load_config_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
