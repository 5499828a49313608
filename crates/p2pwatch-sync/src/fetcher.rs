//! One-shot retrieval of the full session state.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::debug;

use p2pwatch_common::{Snapshot, SyncError};

/// Anything that can produce one complete snapshot on demand.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> Result<Snapshot, SyncError>;
}

/// Fetches the snapshot from the node's state endpoint.
///
/// A failed fetch is not retried; the update stream is expected to fill the
/// store instead.
pub struct SnapshotFetcher {
    http: reqwest::Client,
    url: String,
}

impl SnapshotFetcher {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SnapshotSource for SnapshotFetcher {
    async fn fetch(&self) -> Result<Snapshot, SyncError> {
        debug!(url = %self.url, "Fetching snapshot");

        let response = self
            .http
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SyncError::Transport(format!("GET {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Transport(format!(
                "GET {} returned {status}",
                self.url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Transport(format!("reading {} failed: {e}", self.url)))?;

        Snapshot::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        // Port 9 (discard) is closed on test machines
        let fetcher = SnapshotFetcher::new(http, "http://127.0.0.1:9/api/state");
        let err = fetcher.fetch().await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("/api/state"));
    }

    #[test]
    fn keeps_configured_url() {
        let fetcher = SnapshotFetcher::new(reqwest::Client::new(), "http://node:3000/api/state");
        assert_eq!(fetcher.url(), "http://node:3000/api/state");
    }
}
