pub mod concerns;
pub mod filters;
pub mod recommendations;
pub mod search_text;
pub mod similarity;
pub mod stop_words;

pub use concerns::ConcernSynonyms;
pub use recommendations::RecommendationEngine;
pub use similarity::{ModelError, TfidfModel};
