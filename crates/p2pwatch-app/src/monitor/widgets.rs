//! One elapsed-time widget per listed client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::debug;

use p2pwatch_sync::{Clock, ElapsedTimeWidget, Snapshot};

pub struct WidgetSet {
    widgets: HashMap<String, ElapsedTimeWidget>,
    clock: Arc<dyn Clock>,
    period: Duration,
    redraw: Arc<Notify>,
}

impl WidgetSet {
    /// Every widget refresh signals `redraw`.
    pub fn new(clock: Arc<dyn Clock>, period: Duration, redraw: Arc<Notify>) -> Self {
        Self {
            widgets: HashMap::new(),
            clock,
            period,
            redraw,
        }
    }

    /// Match the widgets to the clients in `snapshot`.
    ///
    /// Existing widgets are pointed at the client's current timestamp,
    /// missing ones are started, and widgets of departed clients are dropped.
    /// A client without a usable timestamp gets no widget and no label.
    pub fn reconcile(&mut self, snapshot: Option<&Snapshot>) {
        let rows = snapshot.map(Snapshot::rows).unwrap_or_default();

        self.widgets.retain(|id, _| {
            rows.iter()
                .any(|(client, _)| &client.id == id && client.connected_at.is_some())
        });

        for (client, _) in rows {
            let Some(connected_at) = client.connected_at else {
                continue;
            };
            match self.widgets.get_mut(&client.id) {
                Some(widget) => {
                    if widget.set_timestamp(connected_at) {
                        debug!(client = %client.id, "Client timestamp changed");
                    }
                }
                None => {
                    let redraw = Arc::clone(&self.redraw);
                    let widget = ElapsedTimeWidget::start_with_listener(
                        connected_at,
                        Arc::clone(&self.clock),
                        self.period,
                        move |_| redraw.notify_one(),
                    );
                    self.widgets.insert(client.id.clone(), widget);
                }
            }
        }
    }

    pub fn labels(&self) -> HashMap<String, String> {
        self.widgets
            .iter()
            .map(|(id, widget)| (id.clone(), widget.display()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Stop and drop every widget.
    pub fn clear(&mut self) {
        self.widgets.clear();
    }
}
