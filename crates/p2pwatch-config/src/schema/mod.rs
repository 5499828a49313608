//! Configuration schema types for p2pwatch.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults that talk to a local node.

mod display;
mod logging;
mod server;
mod stream;

pub use display::*;
pub use logging::*;
pub use server::*;
pub use stream::*;

use serde::{Deserialize, Serialize};

/// Root configuration for p2pwatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}
