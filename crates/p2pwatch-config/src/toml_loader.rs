//! TOML config file loading and creation.

mod template;


use crate::schema::WatchConfig;
use crate::validation;
use p2pwatch_common::ConfigError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use template::default_config_toml;

/// Read and validate the config at `path`.
///
/// Absent keys take their defaults. A file that parses but fails validation
/// is replaced wholesale by the defaults, with a warning.
pub fn load_from_path(path: &Path) -> Result<WatchConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config: WatchConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    match validation::validate(&config) {
        Ok(()) => {
            info!(path = %path.display(), "Config loaded");
            Ok(config)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
            Ok(WatchConfig::default())
        }
    }
}

/// Load `config.toml` from the platform config directory, writing a
/// commented template there on first run.
pub fn load_default() -> Result<WatchConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(WatchConfig::default())
        }
        other => other,
    }
}

/// `<config dir>/p2pwatch/config.toml`, e.g. `~/.config/p2pwatch/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("p2pwatch").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Write the commented template to `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ConfigError::Io { path, source }
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    std::fs::write(path, default_config_toml()).map_err(io_error(path))?;

    info!(path = %path.display(), "Wrote default config");
    Ok(())
}
