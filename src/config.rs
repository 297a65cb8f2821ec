//! Scoring configuration: calibrated defaults with optional TOML override.

use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{info, warn};

/// Rule penalties and thresholds for a scoring pass.
///
/// Defaults are the calibrated production values; a TOML file can override
/// them for experimentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Penalty when device_type differs from the modal device.
    pub device_penalty: f64,
    /// Penalty when login_method differs from the modal method.
    pub method_penalty: f64,
    /// Penalty when channel differs from the modal channel.
    pub channel_penalty: f64,
    /// Penalty when the login hour is more than `hour_window` from modal.
    pub hour_penalty: f64,
    /// Linear hour distance beyond which "Odd Login Hour" fires.
    pub hour_window: i64,
    /// Penalty for physically implausible travel between consecutive logins.
    pub velocity_penalty: f64,
    /// Implied travel speed (km/h) above which a location jump is flagged.
    /// Calibrated against WGS84 ellipsoidal geodesic distances.
    pub speed_limit_kmh: f64,
    /// Display threshold: events scoring strictly above it are anomalies.
    pub threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            device_penalty: 0.25,
            method_penalty: 0.25,
            channel_penalty: 0.20,
            hour_penalty: 0.20,
            hour_window: 3,
            velocity_penalty: 0.30,
            speed_limit_kmh: 500.0,
            threshold: 0.4,
        }
    }
}

impl ScoringConfig {
    /// Load config from a TOML file, falling back to defaults if the file is
    /// missing or unparseable.
    pub fn load(path: &str) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match toml::from_str(&content) {
                Ok(config) => {
                    info!("Loaded scoring config from {}", path);
                    return config;
                }
                Err(e) => {
                    warn!("Failed to parse config at {}: {}. Using defaults.", path, e);
                }
            }
        } else {
            warn!("Config file not found at {}. Using defaults.", path);
        }
        Self::default()
    }
}
