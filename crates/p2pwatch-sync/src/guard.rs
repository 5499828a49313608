//! Scoped ownership of background tasks.

use tokio::task::JoinHandle;

/// Owns a spawned task and aborts it when cancelled or dropped.
///
/// Cancelling an empty or already-cancelled guard is a no-op.
#[derive(Debug, Default)]
pub struct TaskGuard {
    handle: Option<JoinHandle<()>>,
}

impl TaskGuard {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether the guarded task is still running.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn ticking(counter: Arc<AtomicUsize>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let guard = TaskGuard::new(ticking(Arc::clone(&counter)));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        drop(guard);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut guard = TaskGuard::new(ticking(Arc::clone(&counter)));
        assert!(guard.is_active());

        guard.cancel();
        guard.cancel();
        assert!(!guard.is_active());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_guard_is_inactive() {
        let mut guard = TaskGuard::empty();
        assert!(!guard.is_active());
        guard.cancel();
    }
}
