use serde::{Deserialize, Serialize};

use super::ProductId;

/// Reference entry describing a single cosmetic ingredient
///
/// Only used to drive filters (and the ingredient listing); never scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngredientReference {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub what_is_it: String,
    #[serde(default)]
    pub what_does_it_do: String,
    #[serde(default)]
    pub who_is_it_good_for: String,
    /// Free text tag list, e.g. "['Pregnancy', 'Sensitive skin']"
    #[serde(default)]
    pub who_should_avoid: String,
}

impl IngredientReference {
    /// Whether the "who should avoid" tags mention pregnancy
    pub fn avoid_during_pregnancy(&self) -> bool {
        self.who_should_avoid.to_lowercase().contains("pregnancy")
    }
}

/// Links a product to an allergen it contains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllergenAssociation {
    pub product_id: ProductId,
    pub allergen_name: String,
}
