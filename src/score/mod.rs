//! Anomaly scoring: baseline profiling, deviation flags, travel analysis,
//! aggregation, and selection.

pub mod baseline;
pub mod deviation;
pub mod engine;
pub mod travel;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("cannot score an empty history: no events for user")]
    EmptyHistory,

    #[error("invalid coordinate: lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Presentation tier for a scored event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Medium,
    Low,
}

/// Risk assessment for one login event within one scoring pass.
///
/// Recomputed fresh on every pass over a history; carries no identity of its
/// own beyond the event it describes.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnomalyResult {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub city: String,
    /// Flag labels in the order they were applied.
    pub reasons: Vec<String>,
    /// Accumulated penalty, clamped to [0.0, 1.0].
    pub score: f64,
    pub tier: Tier,
}

impl AnomalyResult {
    /// Display form of the reason list, semicolon-joined.
    pub fn reason(&self) -> String {
        self.reasons.join("; ")
    }
}

/// Tier bands over the clamped score: > 0.7 high, > 0.4 medium, else low.
pub fn tier_for(score: f64) -> Tier {
    if score > 0.7 {
        Tier::High
    } else if score > 0.4 {
        Tier::Medium
    } else {
        Tier::Low
    }
}

// Flag labels, as rendered to collaborators.
pub const UNUSUAL_DEVICE: &str = "Unusual Device";
pub const UNUSUAL_METHOD: &str = "Unusual Method";
pub const UNUSUAL_CHANNEL: &str = "Unusual Channel";
pub const ODD_LOGIN_HOUR: &str = "Odd Login Hour";
pub const HIGH_GEO_VELOCITY: &str = "High GeoVelocity";
