use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no platform config directory")]
    NoConfigDir,
}

/// Failures of the snapshot fetch or the update stream.
///
/// Neither variant is fatal to a view: a transport failure leaves the store
/// as it was, a decode failure discards the one payload that caused it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Request failed, connection dropped, or a non-success status came back.
    #[error("transport error: {0}")]
    Transport(String),

    /// Payload was not a valid snapshot.
    #[error("decode error: {0}")]
    Decode(String),
}

impl SyncError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("stream.reconnect_delay_ms out of range".into());
        assert_eq!(
            err.to_string(),
            "config validation error: stream.reconnect_delay_ms out of range"
        );

        let err = ConfigError::Io {
            path: PathBuf::from("/etc/p2pwatch"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "config I/O error at /etc/p2pwatch: denied");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn sync_error_display() {
        let err = SyncError::Transport("GET /api/state returned 503".into());
        assert_eq!(err.to_string(), "transport error: GET /api/state returned 503");

        let err = SyncError::Decode("expected value at line 1 column 1".into());
        assert_eq!(err.to_string(), "decode error: expected value at line 1 column 1");
    }

    #[test]
    fn sync_error_kind_predicates() {
        assert!(SyncError::Transport("refused".into()).is_transport());
        assert!(!SyncError::Transport("refused".into()).is_decode());
        assert!(SyncError::Decode("bad".into()).is_decode());
    }

    #[test]
    fn sync_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SyncError = json_err.into();
        assert!(err.is_decode());
    }

    #[test]
    fn watch_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: WatchError = config_err.into();
        assert!(matches!(err, WatchError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn watch_error_from_sync() {
        let err: WatchError = SyncError::Transport("connection refused".into()).into();
        assert!(matches!(err, WatchError::Sync(_)));
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn watch_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err: WatchError = io_err.into();
        assert!(matches!(err, WatchError::Io(_)));
        assert!(err.to_string().contains("stdout closed"));
    }

    #[test]
    fn watch_error_other() {
        let err = WatchError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
