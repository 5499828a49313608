//! The single in-memory holder of the latest known snapshot.
//!
//! Every write replaces the whole snapshot; there is no merging and no
//! staleness check beyond arrival order. Observers are notified
//! synchronously before `write` returns, and async renderers can follow the
//! store through a [`tokio::sync::watch`] receiver.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;
use tracing::{debug, trace};

use p2pwatch_common::Snapshot;

/// Which component produced the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    Fetch,
    Stream,
}

/// What the store currently holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StoreState {
    /// Nothing has been written yet.
    #[default]
    Unloaded,
    Loaded {
        snapshot: Arc<Snapshot>,
        source: UpdateSource,
        /// Local write counter, starting at 1 for the first write.
        revision: u64,
    },
}

impl StoreState {
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            Self::Unloaded => None,
            Self::Loaded { snapshot, .. } => Some(snapshot),
        }
    }

    pub fn source(&self) -> Option<UpdateSource> {
        match self {
            Self::Unloaded => None,
            Self::Loaded { source, .. } => Some(*source),
        }
    }

    pub fn revision(&self) -> u64 {
        match self {
            Self::Unloaded => 0,
            Self::Loaded { revision, .. } => *revision,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

type Observer = Arc<dyn Fn(&StoreState) + Send + Sync>;

struct Inner {
    state: watch::Sender<StoreState>,
    observers: Mutex<Vec<(u64, Observer)>>,
    next_observer: AtomicU64,
    /// Serializes writes with each other and with `close`.
    write_lock: Mutex<()>,
    closed: AtomicBool,
}

/// Shared handle to the view's state cell. Clones refer to the same store.
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<Inner>,
}

impl StateStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(StoreState::Unloaded);
        Self {
            inner: Arc::new(Inner {
                state,
                observers: Mutex::new(Vec::new()),
                next_observer: AtomicU64::new(1),
                write_lock: Mutex::new(()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn read(&self) -> StoreState {
        self.inner.state.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.state.borrow().snapshot().cloned()
    }

    /// Replace the stored snapshot and notify observers.
    ///
    /// Returns `false` without touching the store once it has been closed.
    /// Observers run while the write is still in progress and must not
    /// write to the store themselves.
    pub fn write(&self, snapshot: Snapshot, source: UpdateSource) -> bool {
        let _write = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.inner.closed.load(Ordering::Acquire) {
            debug!(?source, "Ignoring write to closed store");
            return false;
        }

        let revision = self.inner.state.borrow().revision() + 1;
        let next = StoreState::Loaded {
            snapshot: Arc::new(snapshot),
            source,
            revision,
        };
        self.inner.state.send_replace(next.clone());
        trace!(?source, revision, "Store updated");

        let observers: Vec<Observer> = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(&next);
        }
        true
    }

    /// Register a synchronous observer, called on every successful write.
    ///
    /// The observer stays registered until the returned [`Subscription`] is
    /// dropped.
    pub fn subscribe(&self, observer: impl Fn(&StoreState) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_observer.fetch_add(1, Ordering::Relaxed);
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(observer)));
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// A receiver that wakes on every write, for async renderers.
    pub fn watch(&self) -> watch::Receiver<StoreState> {
        self.inner.state.subscribe()
    }

    /// Seal the store. Once this returns no write can land.
    pub fn close(&self) {
        let _write = self
            .inner
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.inner.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("state", &*self.inner.state.borrow())
            .field("observers", &self.observer_count())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Keeps an observer registered; unregisters it on drop.
pub struct Subscription {
    store: Weak<Inner>,
    id: u64,
}

impl Subscription {
    /// Unregister now instead of at drop.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .observers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use p2pwatch_common::ClientRef;
    use std::sync::atomic::AtomicUsize;

    fn client(id: &str) -> ClientRef {
        ClientRef::new(id, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    fn snapshot(current: &str, roster: &[&str]) -> Snapshot {
        Snapshot::new(
            Some(client(current)),
            roster.iter().map(|id| client(id)).collect(),
        )
    }

    #[test]
    fn starts_unloaded() {
        let store = StateStore::new();
        assert_eq!(store.read(), StoreState::Unloaded);
        assert!(store.snapshot().is_none());
        assert_eq!(store.read().revision(), 0);
    }

    #[test]
    fn every_write_fully_replaces() {
        let store = StateStore::new();
        let events = [
            snapshot("A", &["A", "B", "C"]),
            snapshot("B", &["B"]),
            Snapshot::new(None, vec![]),
            snapshot("C", &["A", "C"]),
        ];

        for (i, event) in events.iter().enumerate() {
            assert!(store.write(event.clone(), UpdateSource::Stream));
            let state = store.read();
            assert_eq!(state.snapshot().map(|s| s.as_ref()), Some(event));
            assert_eq!(state.revision(), i as u64 + 1);
        }
    }

    #[test]
    fn records_the_writing_source() {
        let store = StateStore::new();
        store.write(snapshot("A", &["A"]), UpdateSource::Fetch);
        assert_eq!(store.read().source(), Some(UpdateSource::Fetch));

        store.write(snapshot("B", &["A"]), UpdateSource::Stream);
        assert_eq!(store.read().source(), Some(UpdateSource::Stream));
    }

    #[test]
    fn observers_are_notified_before_write_returns() {
        let store = StateStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |state| {
            let id = state
                .snapshot()
                .and_then(|s| s.current_id().map(str::to_owned));
            sink.lock().unwrap().push(id);
        });

        store.write(snapshot("A", &["A"]), UpdateSource::Fetch);
        assert_eq!(*seen.lock().unwrap(), vec![Some("A".to_string())]);

        store.write(snapshot("B", &["A", "B"]), UpdateSource::Stream);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let store = StateStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.observer_count(), 1);

        store.write(snapshot("A", &[]), UpdateSource::Fetch);
        sub.unsubscribe();
        assert_eq!(store.observer_count(), 0);

        store.write(snapshot("B", &[]), UpdateSource::Stream);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn closed_store_rejects_writes() {
        let store = StateStore::new();
        store.write(snapshot("A", &["A"]), UpdateSource::Fetch);

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.close();
        assert!(store.is_closed());
        assert!(!store.write(snapshot("B", &["B"]), UpdateSource::Stream));
        assert_eq!(store.snapshot().unwrap().current_id(), Some("A"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clones_share_state() {
        let store = StateStore::new();
        let other = store.clone();
        other.write(snapshot("A", &["A"]), UpdateSource::Stream);
        assert!(store.read().is_loaded());
    }

    #[tokio::test]
    async fn watch_receiver_sees_writes() {
        let store = StateStore::new();
        let mut rx = store.watch();
        assert!(!rx.borrow().is_loaded());

        let writer = store.clone();
        tokio::spawn(async move {
            writer.write(snapshot("A", &["A", "B"]), UpdateSource::Fetch);
        });

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().snapshot().unwrap().clients.len(), 2);
    }
}
