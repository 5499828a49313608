//! Wire types for the session state payload.
//!
//! The same JSON shape is served by the state endpoint and carried by every
//! update stream event, so both sides decode through [`Snapshot::from_json`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::SyncError;

/// One participant in the session roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub addr: String,
    /// Timestamp the relative-time label is computed from. `None` when the
    /// node sent no timestamp or one that is not RFC 3339.
    #[serde(
        rename = "updatedAt",
        alias = "connectedAt",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub connected_at: Option<DateTime<Utc>>,
    /// Fields the sync engine does not interpret, kept for the renderer.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClientRef {
    pub fn new(id: impl Into<String>, connected_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            addr: String::new(),
            connected_at: Some(connected_at),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }
}

/// Complete session state at one instant: the active client and the roster.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub current: Option<ClientRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub clients: Vec<ClientRef>,
}

impl Snapshot {
    pub fn new(current: Option<ClientRef>, clients: Vec<ClientRef>) -> Self {
        Self { current, clients }
    }

    /// Decode a snapshot from a JSON document.
    pub fn from_json(raw: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.id.as_str())
    }

    pub fn is_current(&self, client: &ClientRef) -> bool {
        self.current_id() == Some(client.id.as_str())
    }

    pub fn find(&self, id: &str) -> Option<&ClientRef> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Whether the active client also appears in the roster.
    pub fn current_in_roster(&self) -> bool {
        self.current_id().is_some_and(|id| self.find(id).is_some())
    }

    /// Rows to display, each paired with its "active" flag.
    ///
    /// When the active client is listed in the roster it is marked in place.
    /// When it is not, it is shown first so it never disappears from view.
    pub fn rows(&self) -> Vec<(&ClientRef, bool)> {
        let mut rows = Vec::with_capacity(self.clients.len() + 1);
        if let Some(current) = &self.current {
            if !self.current_in_roster() {
                rows.push((current, true));
            }
        }
        for client in &self.clients {
            rows.push((client, self.is_current(client)));
        }
        rows
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.with_timezone(&Utc)))
}
