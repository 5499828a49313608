pub mod errors;
pub mod types;

pub use errors::{ConfigError, SyncError, WatchError};
pub use types::{ClientRef, Snapshot};

pub type Result<T> = std::result::Result<T, WatchError>;
