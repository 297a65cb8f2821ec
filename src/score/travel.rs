//! Sequential travel analysis: physically implausible jumps between
//! consecutive logins.

use crate::config::ScoringConfig;
use crate::geo;
use crate::model::UserHistory;
use crate::score::deviation::Flag;
use crate::score::HIGH_GEO_VELOCITY;
use tracing::warn;

/// Walk consecutive event pairs in chronological order and return the travel
/// contribution per event index.
///
/// Index 0 can never carry a contribution: the first event has no predecessor.
/// Pairs with non-positive elapsed time (duplicate or equal timestamps after
/// the sort) are skipped, as are pairs with malformed coordinates, which are
/// logged and must not abort the pass.
pub fn flag_impossible_travel(history: &UserHistory, config: &ScoringConfig) -> Vec<Option<Flag>> {
    let events = history.events();
    let mut contributions: Vec<Option<Flag>> = vec![None; events.len()];

    for i in 1..events.len() {
        let prev = &events[i - 1];
        let curr = &events[i];

        // Millisecond precision: a sub-second gap is still a positive Δt and
        // must be speed-checked, not dropped by whole-second truncation.
        let elapsed_hours =
            (curr.timestamp - prev.timestamp).num_milliseconds() as f64 / 3_600_000.0;
        if elapsed_hours <= 0.0 {
            continue;
        }

        let distance = match geo::distance_km(prev.lat, prev.lon, curr.lat, curr.lon) {
            Ok(d) => d,
            Err(e) => {
                warn!(user_id = %history.user_id, pair = i, error = %e, "Skipping travel check for pair with bad coordinates");
                continue;
            }
        };

        let speed = distance / elapsed_hours;
        if speed > config.speed_limit_kmh {
            warn!(
                user_id = %history.user_id,
                from = %prev.city,
                to = %curr.city,
                speed_kmh = format!("{:.0}", speed),
                "Implausible travel speed between consecutive logins"
            );
            contributions[i] = Some(Flag {
                label: HIGH_GEO_VELOCITY,
                penalty: config.velocity_penalty,
            });
        }
    }

    contributions
}
