//! Configuration and link state for the update stream.

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where to subscribe and how to back off between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStreamConfig {
    /// Absolute URL of the event stream endpoint.
    pub url: String,
    /// Delay before the first reconnect attempt.
    pub reconnect_delay: Duration,
    /// Upper bound for the doubled delay.
    pub max_reconnect_delay: Duration,
}

impl UpdateStreamConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
        }
    }

    pub fn with_delays(mut self, reconnect_delay: Duration, max_reconnect_delay: Duration) -> Self {
        self.reconnect_delay = reconnect_delay;
        self.max_reconnect_delay = max_reconnect_delay.max(reconnect_delay);
        self
    }

    /// The delay to use after `current` has elapsed without success.
    pub fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_reconnect_delay)
    }
}

// ---------------------------------------------------------------------------
// Link Status
// ---------------------------------------------------------------------------

/// Connection state of the update stream.
///
/// `Closed` is terminal: it is only entered through an explicit close and is
/// never left again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    #[default]
    Connecting,
    Open,
    Reconnecting,
    Closed,
}

impl LinkStatus {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Open => "live",
            Self::Reconnecting => "reconnecting",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
