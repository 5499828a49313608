//! Subscription to the node's server-sent events feed.
//!
//! Each `message` event carries a complete snapshot. The connection is kept
//! open in a background task that reconnects with exponential backoff, and
//! its state is published as a [`LinkStatus`].

mod client;
mod connection;
mod types;

pub use client::UpdateStream;
pub use connection::{apply_event, EventOutcome};
pub use types::{LinkStatus, UpdateStreamConfig};
