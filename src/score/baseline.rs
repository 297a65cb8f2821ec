//! Baseline profiling: a user's statistically typical behavior, computed
//! from their own history.

use crate::model::UserHistory;
use crate::score::ScoreError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Modal behavior profile for one user, scoped to one history snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct BaselineProfile {
    pub modal_device: String,
    pub modal_method: String,
    pub modal_channel: String,
    pub modal_hour: u32,
}

/// Extended per-user summary for display collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub total_logins: usize,
    pub modal_device: String,
    pub modal_method: String,
    pub modal_channel: String,
    pub modal_city: String,
    pub modal_os_browser: String,
    pub modal_hour: u32,
    /// Login counts per hour-of-day, ascending by hour.
    pub hour_histogram: BTreeMap<u32, usize>,
}

/// Headline figures for one side of a user-to-user comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonColumn {
    pub user_id: String,
    pub total_logins: usize,
    pub modal_device: String,
    pub modal_channel: String,
    pub modal_hour: u32,
}

/// Side-by-side baseline comparison of two users.
#[derive(Debug, Clone, Serialize)]
pub struct UserComparison {
    pub left: ComparisonColumn,
    pub right: ComparisonColumn,
}

/// Compute the four modal fields over a non-empty history.
///
/// Each field's mode is its own independent majority vote. Ties are broken by
/// the value first encountered in chronologically sorted order, so repeated
/// passes over the same snapshot always agree.
pub fn compute_baseline(history: &UserHistory) -> Result<BaselineProfile, ScoreError> {
    if history.is_empty() {
        return Err(ScoreError::EmptyHistory);
    }

    let events = history.events();
    Ok(BaselineProfile {
        modal_device: mode(events.iter().map(|e| e.device_type.clone())),
        modal_method: mode(events.iter().map(|e| e.login_method.clone())),
        modal_channel: mode(events.iter().map(|e| e.channel.clone())),
        modal_hour: mode(events.iter().map(|e| e.login_hour())),
    })
}

/// Full summary-panel view: baseline plus the display-only modes and the
/// login-hour histogram.
pub fn compute_summary(history: &UserHistory) -> Result<UserSummary, ScoreError> {
    let baseline = compute_baseline(history)?;
    let events = history.events();

    let mut hour_histogram = BTreeMap::new();
    for e in events {
        *hour_histogram.entry(e.login_hour()).or_insert(0) += 1;
    }

    Ok(UserSummary {
        user_id: history.user_id.clone(),
        total_logins: events.len(),
        modal_device: baseline.modal_device,
        modal_method: baseline.modal_method,
        modal_channel: baseline.modal_channel,
        modal_city: mode(events.iter().map(|e| e.city.clone())),
        modal_os_browser: mode(events.iter().map(|e| e.os_browser.clone())),
        modal_hour: baseline.modal_hour,
        hour_histogram,
    })
}

/// Compare two users' headline baselines side by side. Each column is
/// computed independently from its own history; fails on either being empty.
pub fn compare_users(
    left: &UserHistory,
    right: &UserHistory,
) -> Result<UserComparison, ScoreError> {
    Ok(UserComparison {
        left: comparison_column(left)?,
        right: comparison_column(right)?,
    })
}

fn comparison_column(history: &UserHistory) -> Result<ComparisonColumn, ScoreError> {
    let baseline = compute_baseline(history)?;
    Ok(ComparisonColumn {
        user_id: history.user_id.clone(),
        total_logins: history.len(),
        modal_device: baseline.modal_device,
        modal_channel: baseline.modal_channel,
        modal_hour: baseline.modal_hour,
    })
}

/// Most frequent value in iteration order, first-encountered wins ties.
///
/// Counting preserves first-encounter positions; the scan only replaces the
/// running best on a strictly greater count. (`max_by_key` keeps the *last*
/// maximum, which would silently flip tie-breaks.)
fn mode<T: PartialEq>(values: impl Iterator<Item = T>) -> T {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for v in values {
        match counts.iter_mut().find(|(seen, _)| *seen == v) {
            Some((_, n)) => *n += 1,
            None => counts.push((v, 1)),
        }
    }

    let mut best = 0;
    for (i, (_, n)) in counts.iter().enumerate() {
        if *n > counts[best].1 {
            best = i;
        }
    }
    counts.swap_remove(best).0
}
