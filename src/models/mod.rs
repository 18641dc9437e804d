mod history;
mod ingredient;
mod product;
mod recommendation;

pub use history::HistoryEntry;
pub use ingredient::{AllergenAssociation, IngredientReference};
pub use product::{Product, ProductId, SkinType, SkinTypeFlags};
pub use recommendation::{
    Recommendation, RecommendationOutcome, RecommendationRequest, DEFAULT_TOP_N,
};
