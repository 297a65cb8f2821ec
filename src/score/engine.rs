//! Score aggregation and anomaly selection.

use crate::config::ScoringConfig;
use crate::model::UserHistory;
use crate::score::baseline::compute_baseline;
use crate::score::deviation::flag_deviations;
use crate::score::travel::flag_impossible_travel;
use crate::score::{tier_for, AnomalyResult, ScoreError};
use tracing::debug;

/// Score every event in a history: deviation flags plus travel flags, folded
/// into one reason list and one score per event, clamped to [0, 1] at this
/// single point.
///
/// Pure over the snapshot: input events are untouched and results are fresh
/// each pass, so re-running over the same history is idempotent.
pub fn score_history(
    history: &UserHistory,
    config: &ScoringConfig,
) -> Result<Vec<AnomalyResult>, ScoreError> {
    let baseline = compute_baseline(history)?;
    let travel = flag_impossible_travel(history, config);

    let results = history
        .events()
        .iter()
        .zip(travel)
        .map(|(event, travel_flag)| {
            let mut flags = flag_deviations(event, &baseline, config);
            if let Some(f) = travel_flag {
                flags.push(f);
            }

            let raw: f64 = flags.iter().map(|f| f.penalty).sum();
            let score = raw.clamp(0.0, 1.0);
            AnomalyResult {
                user_id: event.user_id.clone(),
                timestamp: event.timestamp,
                city: event.city.clone(),
                reasons: flags.into_iter().map(|f| f.label.to_string()).collect(),
                score,
                tier: tier_for(score),
            }
        })
        .collect::<Vec<_>>();

    debug!(
        user_id = %history.user_id,
        events = results.len(),
        flagged = results.iter().filter(|r| !r.reasons.is_empty()).count(),
        "Scoring pass complete"
    );

    Ok(results)
}

/// Events scoring strictly above the threshold, in chronological order.
///
/// An event at exactly the threshold is excluded. Never fails; an all-quiet
/// history yields an empty selection.
pub fn select_anomalies(results: &[AnomalyResult], threshold: f64) -> Vec<AnomalyResult> {
    results
        .iter()
        .filter(|r| r.score > threshold)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoginEvent;
    use crate::score::{Tier, HIGH_GEO_VELOCITY, UNUSUAL_DEVICE};

    fn event(ts: &str, device: &str, lat: f64, lon: f64) -> LoginEvent {
        LoginEvent {
            user_id: "U0001".to_string(),
            timestamp: ts.parse().unwrap(),
            device_type: device.to_string(),
            login_method: "password".to_string(),
            channel: "app".to_string(),
            os_browser: "Android/Chrome".to_string(),
            city: "New York".to_string(),
            lat,
            lon,
        }
    }

    fn baseline_events() -> Vec<LoginEvent> {
        vec![
            event("2024-03-01T09:00:00Z", "mobile", 40.7128, -74.0060),
            event("2024-03-02T09:10:00Z", "mobile", 40.7128, -74.0060),
            event("2024-03-03T09:20:00Z", "mobile", 40.7128, -74.0060),
        ]
    }

    #[test]
    fn test_single_deviation_scores_exactly_the_penalty() {
        let mut events = baseline_events();
        events.push(event("2024-03-04T09:00:00Z", "desktop", 40.7128, -74.0060));
        let h = UserHistory::new("U0001", events);

        let results = score_history(&h, &ScoringConfig::default()).unwrap();
        let last = results.last().unwrap();
        assert_eq!(last.reasons, vec![UNUSUAL_DEVICE.to_string()]);
        assert_eq!(last.score, 0.25);
        assert_eq!(last.tier, Tier::Low);
    }

    #[test]
    fn test_all_flags_clamp_to_one() {
        let mut events = baseline_events();
        // One hour after the last New York login, from Los Angeles, with
        // every attribute off-baseline and an odd hour: 0.9 + 0.3 pre-clamp.
        let mut e = event("2024-03-03T23:00:00Z", "desktop", 34.0522, -118.2437);
        e.login_method = "OTP".to_string();
        e.channel = "web".to_string();
        // Move the previous login close in time to force the velocity flag.
        events.push(event("2024-03-03T22:00:00Z", "mobile", 40.7128, -74.0060));
        events.push(e);
        let h = UserHistory::new("U0001", events);

        let results = score_history(&h, &ScoringConfig::default()).unwrap();
        let last = results.last().unwrap();
        assert!(last.reasons.contains(&HIGH_GEO_VELOCITY.to_string()));
        assert_eq!(last.score, 1.0);
        assert_eq!(last.tier, Tier::High);
    }

    #[test]
    fn test_travel_flag_comes_last_in_reason_order() {
        let mut events = baseline_events();
        events.push(event("2024-03-03T10:20:00Z", "desktop", 34.0522, -118.2437));
        let h = UserHistory::new("U0001", events);

        let results = score_history(&h, &ScoringConfig::default()).unwrap();
        let last = results.last().unwrap();
        assert_eq!(
            last.reasons,
            vec![UNUSUAL_DEVICE.to_string(), HIGH_GEO_VELOCITY.to_string()]
        );
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let h = UserHistory::new("U0001", baseline_events());
        let config = ScoringConfig::default();
        let a = score_history(&h, &config).unwrap();
        let b = score_history(&h, &config).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.score, y.score);
            assert_eq!(x.reasons, y.reasons);
        }
    }

    #[test]
    fn test_selector_threshold_is_strict() {
        let mk = |score: f64| AnomalyResult {
            user_id: "U0001".into(),
            timestamp: "2024-03-01T10:00:00Z".parse().unwrap(),
            city: "New York".into(),
            reasons: vec![],
            score,
            tier: tier_for(score),
        };
        let results = vec![mk(0.4), mk(0.41), mk(0.0)];
        let selected = select_anomalies(&results, 0.4);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].score, 0.41);

        assert!(select_anomalies(&[mk(0.1)], 0.4).is_empty());
    }

    #[test]
    fn test_empty_history_propagates() {
        let h = UserHistory::new("U0001", vec![]);
        assert!(matches!(
            score_history(&h, &ScoringConfig::default()),
            Err(ScoreError::EmptyHistory)
        ));
    }
}
