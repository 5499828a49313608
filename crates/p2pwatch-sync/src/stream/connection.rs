//! Background event-stream connection loop with auto-reconnect.

use std::sync::Arc;

use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use p2pwatch_common::{Snapshot, SyncError};

use super::types::{LinkStatus, UpdateStreamConfig};
use crate::sse::{parse_sse_response, SseEvent};

/// Receives every snapshot decoded from the stream, in arrival order.
pub(crate) type SnapshotSink = Box<dyn FnMut(Snapshot) + Send>;

/// What happened to one event taken off the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The payload decoded and was handed to the sink.
    Applied,
    /// The payload was malformed and dropped; the connection stays open.
    Discarded(SyncError),
    /// Not a `message` event.
    Ignored,
}

/// Decode one event and hand the snapshot to `sink`.
pub fn apply_event(event: &SseEvent, sink: &mut dyn FnMut(Snapshot)) -> EventOutcome {
    if !event.is_message() {
        debug!(event = ?event.event, "Ignoring non-message event");
        return EventOutcome::Ignored;
    }

    match Snapshot::from_json(&event.data) {
        Ok(snapshot) => {
            sink(snapshot);
            EventOutcome::Applied
        }
        Err(e) => {
            warn!(error = %e, "Discarding malformed stream event");
            EventOutcome::Discarded(e)
        }
    }
}

/// Move the link to `next` unless it has already been closed.
pub(crate) fn set_status(status: &watch::Sender<LinkStatus>, next: LinkStatus) {
    status.send_if_modified(|current| {
        if current.is_closed() || *current == next {
            return false;
        }
        *current = next;
        true
    });
}

async fn open(http: &reqwest::Client, url: &str) -> Result<reqwest::Response, SyncError> {
    let response = http
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await
        .map_err(|e| SyncError::Transport(format!("GET {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SyncError::Transport(format!("GET {url} returned {status}")));
    }
    Ok(response)
}

/// Background task holding the stream open until it is aborted.
pub(crate) async fn connection_loop(
    config: UpdateStreamConfig,
    http: reqwest::Client,
    status: Arc<watch::Sender<LinkStatus>>,
    mut sink: SnapshotSink,
) {
    let mut reconnect_delay = config.reconnect_delay;

    loop {
        info!(url = %config.url, "Opening update stream");

        match open(&http, &config.url).await {
            Ok(response) => {
                reconnect_delay = config.reconnect_delay;
                set_status(&status, LinkStatus::Open);

                let mut applied = 0u64;
                let mut discarded = 0u64;
                let result = parse_sse_response(response, |event| {
                    match apply_event(&event, sink.as_mut()) {
                        EventOutcome::Applied => applied += 1,
                        EventOutcome::Discarded(_) => discarded += 1,
                        EventOutcome::Ignored => {}
                    }
                })
                .await;

                match result {
                    Ok(()) => info!(applied, discarded, "Update stream ended"),
                    Err(e) => warn!(error = %e, applied, discarded, "Update stream dropped"),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to open update stream");
            }
        }

        set_status(&status, LinkStatus::Reconnecting);
        info!(
            delay_ms = reconnect_delay.as_millis() as u64,
            "Reconnecting update stream"
        );
        tokio::time::sleep(reconnect_delay).await;
        reconnect_delay = config.next_delay(reconnect_delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(data: &str) -> SseEvent {
        SseEvent {
            event: None,
            data: data.to_string(),
        }
    }

    #[test]
    fn valid_event_reaches_sink() {
        let mut received = Vec::new();
        let outcome = apply_event(
            &message(r#"{"current":{"id":"A","updatedAt":"2024-05-01T10:00:00Z"},"clients":[]}"#),
            &mut |s| received.push(s),
        );
        assert_eq!(outcome, EventOutcome::Applied);
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].current_id(), Some("A"));
    }

    #[test]
    fn malformed_event_is_discarded() {
        let mut received = Vec::new();
        let outcome = apply_event(&message("{\"current\": "), &mut |s| received.push(s));
        assert!(matches!(outcome, EventOutcome::Discarded(ref e) if e.is_decode()));
        assert!(received.is_empty());
    }

    #[test]
    fn named_events_are_ignored() {
        let mut calls = 0;
        let event = SseEvent {
            event: Some("ping".into()),
            data: "{}".into(),
        };
        assert_eq!(apply_event(&event, &mut |_| calls += 1), EventOutcome::Ignored);
        assert_eq!(calls, 0);
    }

    #[test]
    fn closed_status_is_terminal() {
        let (tx, rx) = watch::channel(LinkStatus::Connecting);
        set_status(&tx, LinkStatus::Open);
        assert_eq!(*rx.borrow(), LinkStatus::Open);

        tx.send_replace(LinkStatus::Closed);
        set_status(&tx, LinkStatus::Reconnecting);
        assert_eq!(*rx.borrow(), LinkStatus::Closed);
    }
}
