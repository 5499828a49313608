use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Terminal monitor presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Refresh cadence of the "since" column in milliseconds (valid range: 100-60000).
    pub tick_interval_ms: u64,
    /// Show the address column.
    pub show_addresses: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            show_addresses: true,
        }
    }
}

impl DisplayConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
