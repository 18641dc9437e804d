use std::sync::Arc;

use crate::db::HistoryStore;
use crate::models::DEFAULT_TOP_N;
use crate::services::RecommendationEngine;

/// Shared application state
///
/// Everything behind the `Arc`s is read-only once the server starts.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the catalog could not be loaded at startup
    pub engine: Option<Arc<RecommendationEngine>>,
    /// `None` when no history database is configured
    pub history: Option<Arc<dyn HistoryStore>>,
    pub default_top_n: usize,
}

impl AppState {
    pub fn new(engine: Option<RecommendationEngine>) -> Self {
        Self {
            engine: engine.map(Arc::new),
            history: None,
            default_top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_default_top_n(mut self, default_top_n: usize) -> Self {
        self.default_top_n = default_top_n;
        self
    }
}
