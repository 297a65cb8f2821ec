//! Deviation flagging: per-event comparison against the user's baseline.

use crate::config::ScoringConfig;
use crate::model::LoginEvent;
use crate::score::baseline::BaselineProfile;
use crate::score::{ODD_LOGIN_HOUR, UNUSUAL_CHANNEL, UNUSUAL_DEVICE, UNUSUAL_METHOD};

/// One rule's contribution to an event's result.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    pub label: &'static str,
    pub penalty: f64,
}

/// Evaluate the four deviation rules for one event. Rules are independent and
/// additive; an event can accumulate several flags. Never fails.
pub fn flag_deviations(
    event: &LoginEvent,
    baseline: &BaselineProfile,
    config: &ScoringConfig,
) -> Vec<Flag> {
    let mut flags = Vec::new();

    if event.device_type != baseline.modal_device {
        flags.push(Flag {
            label: UNUSUAL_DEVICE,
            penalty: config.device_penalty,
        });
    }
    if event.login_method != baseline.modal_method {
        flags.push(Flag {
            label: UNUSUAL_METHOD,
            penalty: config.method_penalty,
        });
    }
    if event.channel != baseline.modal_channel {
        flags.push(Flag {
            label: UNUSUAL_CHANNEL,
            penalty: config.channel_penalty,
        });
    }

    // Linear hour distance, not circular: hour 23 against a modal hour of 1
    // reads as 22 apart, even though the clock face says 2. Intentional.
    let hour_diff = (event.login_hour() as i64 - baseline.modal_hour as i64).abs();
    if hour_diff > config.hour_window {
        flags.push(Flag {
            label: ODD_LOGIN_HOUR,
            penalty: config.hour_penalty,
        });
    }

    flags
}
