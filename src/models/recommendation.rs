use serde::{Deserialize, Serialize};

/// Number of results returned when the caller does not ask for a count
pub const DEFAULT_TOP_N: usize = 5;

/// Filters and preferences for one recommendation run
///
/// Every field is optional in spirit: an absent value means "no filter" for
/// that dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Raw skin type label as supplied by the caller (e.g. "Oily Skin")
    pub skin_type: Option<String>,
    /// Comma or slash delimited category filter (e.g. "Moisturizer/Cleanser")
    pub product_type: Option<String>,
    pub concerns: Vec<String>,
    pub allergens: Vec<String>,
    pub pregnancy_safe: bool,
    pub top_n: usize,
}

impl Default for RecommendationRequest {
    fn default() -> Self {
        Self {
            skin_type: None,
            product_type: None,
            concerns: Vec::new(),
            allergens: Vec::new(),
            pregnancy_safe: false,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// A single ranked product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub brand: String,
    pub name: String,
    /// Cosine similarity against the expanded concern query, in [0, 1]
    pub score: f64,
}

/// Ranked results plus an explanation when there is nothing to show
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutcome {
    pub results: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecommendationOutcome {
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            message: Some(message.into()),
        }
    }
}
