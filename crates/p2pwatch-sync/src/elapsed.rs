//! A self-refreshing "time since" label.
//!
//! The widget recomputes its text from a fixed source timestamp and the
//! current wall clock, immediately and then once per period. It reads
//! nothing from the state store; changing the source timestamp restarts the
//! cadence from zero.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::trace;

use crate::clock::Clock;
use crate::guard::TaskGuard;
use crate::humanize::relative_to;

/// Refresh cadence used by the view.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

const MIN_TICK: Duration = Duration::from_millis(1);

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

pub struct ElapsedTimeWidget {
    timestamp: DateTime<Utc>,
    display: Arc<Mutex<String>>,
    clock: Arc<dyn Clock>,
    period: Duration,
    listener: Option<Listener>,
    tick: TaskGuard,
    /// Cleared when the current tick task is superseded or stopped.
    live: Arc<AtomicBool>,
}

impl ElapsedTimeWidget {
    /// Compute the label now and start refreshing it every `period`.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(timestamp: DateTime<Utc>, clock: Arc<dyn Clock>, period: Duration) -> Self {
        Self::build(timestamp, clock, period, None)
    }

    /// Like [`start`](Self::start), calling `listener` with every new label.
    pub fn start_with_listener(
        timestamp: DateTime<Utc>,
        clock: Arc<dyn Clock>,
        period: Duration,
        listener: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        Self::build(timestamp, clock, period, Some(Arc::new(listener)))
    }

    fn build(
        timestamp: DateTime<Utc>,
        clock: Arc<dyn Clock>,
        period: Duration,
        listener: Option<Listener>,
    ) -> Self {
        let mut widget = Self {
            timestamp,
            display: Arc::new(Mutex::new(String::new())),
            clock,
            period: period.max(MIN_TICK),
            listener,
            tick: TaskGuard::empty(),
            live: Arc::new(AtomicBool::new(false)),
        };
        widget.restart();
        widget
    }

    /// Point the widget at a new timestamp.
    ///
    /// Returns `false` and leaves the cadence alone when the timestamp is
    /// unchanged.
    pub fn set_timestamp(&mut self, timestamp: DateTime<Utc>) -> bool {
        if timestamp == self.timestamp {
            return false;
        }
        self.timestamp = timestamp;
        self.restart();
        true
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The most recently computed label.
    pub fn display(&self) -> String {
        self.display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_ticking(&self) -> bool {
        self.tick.is_active()
    }

    /// Stop refreshing. The last label stays readable. Safe to call twice.
    pub fn stop(&mut self) {
        self.live.store(false, Ordering::Release);
        self.tick.cancel();
    }

    fn restart(&mut self) {
        self.stop();

        let live = Arc::new(AtomicBool::new(true));
        self.live = Arc::clone(&live);

        refresh(
            &self.display,
            self.clock.as_ref(),
            self.timestamp,
            self.listener.as_ref(),
        );

        let display = Arc::clone(&self.display);
        let clock = Arc::clone(&self.clock);
        let listener = self.listener.clone();
        let timestamp = self.timestamp;
        let period = self.period;
        let start = Instant::now() + period;

        self.tick = TaskGuard::new(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !live.load(Ordering::Acquire) {
                    break;
                }
                refresh(&display, clock.as_ref(), timestamp, listener.as_ref());
            }
        }));
    }
}

fn refresh(
    display: &Mutex<String>,
    clock: &dyn Clock,
    timestamp: DateTime<Utc>,
    listener: Option<&Listener>,
) {
    let label = relative_to(timestamp, clock.now());
    trace!(%timestamp, label = %label, "Elapsed label refreshed");
    *display.lock().unwrap_or_else(PoisonError::into_inner) = label.clone();
    if let Some(listener) = listener {
        listener(&label);
    }
}

impl Drop for ElapsedTimeWidget {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ElapsedTimeWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElapsedTimeWidget")
            .field("timestamp", &self.timestamp)
            .field("display", &self.display())
            .field("period", &self.period)
            .finish()
    }
}
