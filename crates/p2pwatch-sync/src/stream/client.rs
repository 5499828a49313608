//! Public handle for one update stream subscription.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use p2pwatch_common::Snapshot;

use super::connection::connection_loop;
use super::types::{LinkStatus, UpdateStreamConfig};
use crate::guard::TaskGuard;

/// A live subscription to the update stream.
///
/// Every decoded snapshot is handed to the callback given to
/// [`UpdateStream::open`]. After [`close`](Self::close) the callback is not
/// invoked again and the status stays [`LinkStatus::Closed`].
pub struct UpdateStream {
    status: Arc<watch::Sender<LinkStatus>>,
    alive: Arc<AtomicBool>,
    task: TaskGuard,
}

impl UpdateStream {
    /// Start the background connection. Must be called inside a tokio runtime.
    pub fn open(
        config: UpdateStreamConfig,
        http: reqwest::Client,
        mut on_snapshot: impl FnMut(Snapshot) + Send + 'static,
    ) -> Self {
        let (status, _) = watch::channel(LinkStatus::Connecting);
        let status = Arc::new(status);
        let alive = Arc::new(AtomicBool::new(true));

        let gate = Arc::clone(&alive);
        let sink = Box::new(move |snapshot: Snapshot| {
            if gate.load(Ordering::Acquire) {
                on_snapshot(snapshot);
            }
        });

        let task = TaskGuard::new(tokio::spawn(connection_loop(
            config,
            http,
            Arc::clone(&status),
            sink,
        )));

        Self {
            status,
            alive,
            task,
        }
    }

    pub fn status(&self) -> LinkStatus {
        *self.status.borrow()
    }

    pub fn watch_status(&self) -> watch::Receiver<LinkStatus> {
        self.status.subscribe()
    }

    pub fn is_open(&self) -> bool {
        self.status().is_open()
    }

    /// Stop delivering snapshots and drop the connection. Safe to call twice.
    pub fn close(&mut self) {
        if !self.alive.swap(false, Ordering::AcqRel) {
            return;
        }
        self.task.cancel();
        self.status.send_replace(LinkStatus::Closed);
        debug!("Update stream closed");
    }
}

impl Drop for UpdateStream {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for UpdateStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateStream")
            .field("status", &self.status())
            .finish()
    }
}
