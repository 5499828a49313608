//! State synchronization for the p2p presence view.
//!
//! A [`ViewSession`] owns one activation of the view:
//! - a one-shot [`SnapshotFetcher`] retrieval of the full state
//! - an [`UpdateStream`] subscription to the server-sent events feed
//! - the [`StateStore`] both of them overwrite, which renderers observe
//!
//! [`ElapsedTimeWidget`] is independent of the store and keeps one
//! relative-time label fresh on a fixed cadence.

pub mod clock;
pub mod elapsed;
pub mod fetcher;
pub mod guard;
pub mod humanize;
pub mod session;
pub mod sse;
pub mod store;
pub mod stream;

pub use clock::{Clock, ManualClock, SystemClock};
pub use elapsed::ElapsedTimeWidget;
pub use fetcher::{SnapshotFetcher, SnapshotSource};
pub use guard::TaskGuard;
pub use session::{SessionConfig, ViewSession};
pub use store::{StateStore, StoreState, Subscription, UpdateSource};
pub use stream::{LinkStatus, UpdateStream, UpdateStreamConfig};

pub use p2pwatch_common::{ClientRef, Snapshot, SyncError};
