use crate::config::ScoringConfig;
use crate::model::UserHistory;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared server state: one immutable snapshot of all histories, taken at
/// load time. Handlers score concurrently against it with no locking.
#[derive(Clone)]
pub struct AppState {
    pub histories: Arc<HashMap<String, UserHistory>>,
    pub config: Arc<ScoringConfig>,
}

impl AppState {
    pub fn new(histories: HashMap<String, UserHistory>, config: ScoringConfig) -> Self {
        Self {
            histories: Arc::new(histories),
            config: Arc::new(config),
        }
    }
}
