//! Core data model: login events and per-user histories.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// One authentication attempt, as supplied by the data source collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginEvent {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub device_type: String,
    pub login_method: String,
    pub channel: String,
    pub os_browser: String,
    pub city: String,
    /// WGS84 decimal degrees.
    pub lat: f64,
    pub lon: f64,
}

impl LoginEvent {
    /// Hour-of-day (0-23, UTC) derived from the timestamp.
    ///
    /// Deliberately a method rather than a stored field: the hour can never
    /// drift out of sync with its source timestamp.
    pub fn login_hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Chronologically ordered login history for exactly one user.
///
/// Upstream ordering is untrusted: the constructor always sorts ascending by
/// timestamp. The sort is stable, so timestamp ties keep their input order.
#[derive(Debug, Clone, Serialize)]
pub struct UserHistory {
    pub user_id: String,
    events: Vec<LoginEvent>,
}

impl UserHistory {
    pub fn new(user_id: impl Into<String>, mut events: Vec<LoginEvent>) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self {
            user_id: user_id.into(),
            events,
        }
    }

    pub fn events(&self) -> &[LoginEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
