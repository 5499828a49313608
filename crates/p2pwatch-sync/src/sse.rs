//! Server-Sent Events (SSE) parser.
//!
//! The update stream is a `text/event-stream` body. This module splits it
//! into events; decoding each event's data is left to the caller.

use futures_util::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;
use tracing::debug;

use p2pwatch_common::SyncError;

/// Event type assumed when an event carries no `event:` field.
pub const DEFAULT_EVENT: &str = "message";

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The event type, if the server named one.
    pub event: Option<String>,
    /// The event data; multiple `data:` lines are joined with `\n`.
    pub data: String,
}

impl SseEvent {
    /// Whether this is a default `message` event.
    pub fn is_message(&self) -> bool {
        self.event.as_deref().map_or(true, |e| e == DEFAULT_EVENT)
    }
}

/// Parse an SSE stream from a reqwest response, calling `on_event` for each event.
pub async fn parse_sse_response(
    response: reqwest::Response,
    on_event: impl FnMut(SseEvent),
) -> Result<(), SyncError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    parse_sse_reader(reader, on_event).await
}

/// Parse SSE events from any buffered reader.
///
/// Returns `Ok(())` when the stream ends cleanly and a transport error when
/// reading fails part way. An event still pending when the stream ends was
/// never terminated by a blank line and is dropped.
pub async fn parse_sse_reader<R>(reader: R, mut on_event: impl FnMut(SseEvent)) -> Result<(), SyncError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    let mut current_event: Option<String> = None;
    let mut current_data = String::new();
    let mut has_data = false;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| SyncError::Transport(format!("event stream read failed: {e}")))?
    {
        if line.is_empty() {
            // Empty line = end of event
            if has_data && !current_data.is_empty() {
                on_event(SseEvent {
                    event: current_event.take(),
                    data: std::mem::take(&mut current_data),
                });
            }
            current_event = None;
            current_data.clear();
            has_data = false;
            continue;
        }

        if line.starts_with(':') {
            continue;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line.as_str(), ""),
        };

        match field {
            "event" => current_event = Some(value.to_string()),
            "data" => {
                if has_data {
                    current_data.push('\n');
                }
                current_data.push_str(value);
                has_data = true;
            }
            // id, retry and unknown fields carry nothing the view needs
            _ => {}
        }
    }

    if has_data {
        debug!(bytes = current_data.len(), "Dropping unterminated event at end of stream");
    }

    Ok(())
}
