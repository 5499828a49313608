//! Terminal presence view: redraws the session table whenever the store,
//! the link status, or any elapsed-time label changes.

mod render;
mod widgets;

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;
use tracing::{debug, info};

use p2pwatch_common::{Result, SyncError};
use p2pwatch_config::WatchConfig;
use p2pwatch_sync::humanize::relative_to;
use p2pwatch_sync::{
    SessionConfig, SnapshotFetcher, SnapshotSource, StoreState, SystemClock, UpdateSource,
    UpdateStreamConfig, ViewSession,
};

use render::{render, CLEAR};
use widgets::WidgetSet;

pub fn session_config(config: &WatchConfig) -> SessionConfig {
    SessionConfig {
        state_url: config.server.state_url(),
        stream: UpdateStreamConfig::new(config.server.stream_url()).with_delays(
            config.stream.reconnect_delay(),
            config.stream.max_reconnect_delay(),
        ),
    }
}

fn http_client() -> std::result::Result<reqwest::Client, SyncError> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| SyncError::Transport(format!("failed to build HTTP client: {e}")))
}

/// Fetch one snapshot and print it.
pub async fn print_once(config: &WatchConfig) -> Result<()> {
    let fetcher = SnapshotFetcher::new(http_client()?, config.server.state_url());
    let snapshot = fetcher.fetch().await?;

    let now = Utc::now();
    let labels: HashMap<String, String> = snapshot
        .rows()
        .into_iter()
        .filter_map(|(client, _)| {
            let at = client.connected_at?;
            Some((client.id.clone(), relative_to(at, now)))
        })
        .collect();
    let state = StoreState::Loaded {
        snapshot: Arc::new(snapshot),
        source: UpdateSource::Fetch,
        revision: 1,
    };

    let mut out = std::io::stdout().lock();
    out.write_all(render(&state, &labels, None, config.display.show_addresses).as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Run the live view until Ctrl-C.
pub async fn watch(config: &WatchConfig) -> Result<()> {
    let mut session = ViewSession::activate_with_client(session_config(config), http_client()?);
    let result = run(&session, config.display.tick_interval(), config.display.show_addresses).await;

    session.close();
    result
}

async fn run(session: &ViewSession, tick: Duration, show_addresses: bool) -> Result<()> {
    let redraw = Arc::new(Notify::new());
    let mut widgets = WidgetSet::new(Arc::new(SystemClock), tick, Arc::clone(&redraw));
    let mut store_rx = session.store().watch();
    let mut link_rx = session.watch_link();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    draw(session, &widgets, show_addresses)?;

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                signal?;
                info!("Interrupted, closing view");
                break;
            }
            changed = store_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = store_rx.borrow_and_update().clone();
                widgets.reconcile(state.snapshot().map(|s| s.as_ref()));
                debug!(revision = state.revision(), clients = widgets.len(), "Roster reconciled");
            }
            changed = link_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = *link_rx.borrow_and_update();
                info!(%status, "Update stream status changed");
            }
            _ = redraw.notified() => {}
        }

        draw(session, &widgets, show_addresses)?;
    }

    widgets.clear();
    Ok(())
}

fn draw(session: &ViewSession, widgets: &WidgetSet, show_addresses: bool) -> Result<()> {
    let frame = render(
        &session.store().read(),
        &widgets.labels(),
        Some(session.link_status()),
        show_addresses,
    );

    let mut out = std::io::stdout().lock();
    write!(out, "{CLEAR}{frame}")?;
    out.flush()?;
    Ok(())
}
