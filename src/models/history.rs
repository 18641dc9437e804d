use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Recommendation, RecommendationRequest};

/// A persisted recommendation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    /// Opaque caller-supplied identity; no authentication is performed
    pub user_id: String,
    pub request: RecommendationRequest,
    pub results: Vec<Recommendation>,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates a new entry stamped with a fresh id and the current time
    pub fn new(
        user_id: String,
        request: RecommendationRequest,
        results: Vec<Recommendation>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            request,
            results,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_gets_unique_id() {
        let first = HistoryEntry::new("alice".to_string(), RecommendationRequest::default(), vec![]);
        let second = HistoryEntry::new("alice".to_string(), RecommendationRequest::default(), vec![]);
        assert_ne!(first.id, second.id);
        assert_eq!(first.user_id, "alice");
    }
}
