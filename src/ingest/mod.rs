//! Data source collaborator: JSON login telemetry -> per-user histories.

use crate::model::{LoginEvent, UserHistory};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use tracing::info;

/// Load a JSON array of login events from disk.
pub fn load_events(path: &str) -> Result<Vec<LoginEvent>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events file {}", path))?;
    let events: Vec<LoginEvent> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse events file {}", path))?;
    info!(%path, count = events.len(), "Loaded login events");
    Ok(events)
}

/// Group raw events into per-user chronological snapshots. Each history sorts
/// itself; upstream ordering is not trusted.
pub fn group_by_user(events: Vec<LoginEvent>) -> HashMap<String, UserHistory> {
    let mut grouped: HashMap<String, Vec<LoginEvent>> = HashMap::new();
    for e in events {
        grouped.entry(e.user_id.clone()).or_default().push(e);
    }

    grouped
        .into_iter()
        .map(|(user_id, events)| {
            let history = UserHistory::new(user_id.clone(), events);
            (user_id, history)
        })
        .collect()
}

/// Sorted list of user ids present in a grouped snapshot.
pub fn user_ids(histories: &HashMap<String, UserHistory>) -> Vec<String> {
    let mut ids: Vec<String> = histories.keys().cloned().collect();
    ids.sort();
    ids
}
