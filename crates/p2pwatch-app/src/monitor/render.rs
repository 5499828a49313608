//! Plain-text table of the session state.

use std::collections::HashMap;

use p2pwatch_sync::{LinkStatus, StoreState, UpdateSource};

/// Clears the terminal and homes the cursor.
pub const CLEAR: &str = "\x1b[2J\x1b[H";

const EMPTY_CELL: &str = "-";
const COLUMN_GAP: &str = "  ";

/// Render the current state as a status line followed by an aligned table.
///
/// `labels` maps client ids to their relative-time text; clients without a
/// label show `-`.
pub fn render(
    state: &StoreState,
    labels: &HashMap<String, String>,
    link: Option<LinkStatus>,
    show_addresses: bool,
) -> String {
    let mut out = status_line(state, link);
    out.push('\n');

    let Some(snapshot) = state.snapshot() else {
        out.push_str("waiting for state...\n");
        return out;
    };

    let mut table: Vec<Vec<String>> = Vec::new();
    let mut head = Vec::new();
    if show_addresses {
        head.push("Addr".to_string());
    }
    head.extend(["Name", "Since", "Current"].map(String::from));
    table.push(head);

    for (client, active) in snapshot.rows() {
        let mut row = Vec::new();
        if show_addresses {
            row.push(non_empty(&client.addr, EMPTY_CELL));
        }
        row.push(non_empty(&client.name, &client.id));
        row.push(
            labels
                .get(&client.id)
                .cloned()
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
        );
        row.push(if active { "*" } else { "" }.to_string());
        table.push(row);
    }

    out.push_str(&format_table(&table));
    if table.len() == 1 {
        out.push_str("(no clients)\n");
    }
    out
}

fn status_line(state: &StoreState, link: Option<LinkStatus>) -> String {
    let mut line = String::from("p2pwatch");
    if let Some(link) = link {
        line.push_str(&format!(" [{link}]"));
    }
    if let StoreState::Loaded {
        source, revision, ..
    } = state
    {
        let source = match source {
            UpdateSource::Fetch => "fetch",
            UpdateSource::Stream => "stream",
        };
        line.push_str(&format!(" rev {revision} from {source}"));
    }
    line
}

fn non_empty(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn format_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
