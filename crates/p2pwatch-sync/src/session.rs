//! One activation of the presence view.
//!
//! Activating a session starts the snapshot fetch and opens the update
//! stream concurrently. Both write whole snapshots to the same store and
//! whichever lands last wins. Closing the session seals the store first, so
//! nothing either source delivers afterwards is observable.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use p2pwatch_common::SyncError;

use crate::fetcher::{SnapshotFetcher, SnapshotSource};
use crate::guard::TaskGuard;
use crate::store::{StateStore, UpdateSource};
use crate::stream::{LinkStatus, UpdateStream, UpdateStreamConfig};

/// Endpoints of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub state_url: String,
    pub stream: UpdateStreamConfig,
}

impl SessionConfig {
    pub fn new(state_url: impl Into<String>, stream_url: impl Into<String>) -> Self {
        Self {
            state_url: state_url.into(),
            stream: UpdateStreamConfig::new(stream_url),
        }
    }
}

pub struct ViewSession {
    store: StateStore,
    stream: UpdateStream,
    fetch: TaskGuard,
    closed: bool,
}

impl ViewSession {
    /// Activate against a node with a default HTTP client.
    pub fn activate(config: SessionConfig) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SyncError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::activate_with_client(config, http))
    }

    pub fn activate_with_client(config: SessionConfig, http: reqwest::Client) -> Self {
        let fetcher = Arc::new(SnapshotFetcher::new(http.clone(), config.state_url));
        Self::activate_with(fetcher, config.stream, http)
    }

    /// Activate with an arbitrary snapshot source for the initial fetch.
    ///
    /// Must be called inside a tokio runtime.
    pub fn activate_with(
        source: Arc<dyn SnapshotSource>,
        stream: UpdateStreamConfig,
        http: reqwest::Client,
    ) -> Self {
        let store = StateStore::new();
        info!(stream = %stream.url, "Activating view session");

        let fetch_store = store.clone();
        let fetch = TaskGuard::new(tokio::spawn(async move {
            match source.fetch().await {
                Ok(snapshot) => {
                    debug!(clients = snapshot.clients.len(), "Initial snapshot fetched");
                    fetch_store.write(snapshot, UpdateSource::Fetch);
                }
                Err(e) => {
                    warn!(error = %e, "Initial snapshot fetch failed, waiting for stream");
                }
            }
        }));

        let stream_store = store.clone();
        let stream = UpdateStream::open(stream, http, move |snapshot| {
            stream_store.write(snapshot, UpdateSource::Stream);
        });

        Self {
            store,
            stream,
            fetch,
            closed: false,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn link_status(&self) -> LinkStatus {
        self.stream.status()
    }

    pub fn watch_link(&self) -> watch::Receiver<LinkStatus> {
        self.stream.watch_status()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Tear the session down. Safe to call more than once.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.store.close();
        self.fetch.cancel();
        self.stream.close();
        info!("View session closed");
    }
}

impl Drop for ViewSession {
    fn drop(&mut self) {
        self.close();
    }
}
