use std::collections::HashSet;
use std::path::PathBuf;

use crate::models::{AllergenAssociation, IngredientReference, Product, ProductId};

pub mod loader;

pub use loader::load_catalog;

/// Errors raised while loading the catalog tables
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("product table {0} contains no products")]
    NoProducts(PathBuf),
}

/// Read-only product catalog
///
/// Product table, ingredient reference table and product/allergen links.
/// Built once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    ingredients: Vec<IngredientReference>,
    allergens: Vec<AllergenAssociation>,
}

impl Catalog {
    pub fn new(
        products: Vec<Product>,
        ingredients: Vec<IngredientReference>,
        allergens: Vec<AllergenAssociation>,
    ) -> Self {
        Self {
            products,
            ingredients,
            allergens,
        }
    }

    /// Products in catalog order; positions double as similarity model rows
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    pub fn ingredients(&self) -> &[IngredientReference] {
        &self.ingredients
    }

    pub fn allergens(&self) -> &[AllergenAssociation] {
        &self.allergens
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Ids of every product associated with one of the named allergens
    ///
    /// Allergen names are compared trimmed and case-insensitively.
    pub fn products_with_allergens(&self, allergen_names: &[String]) -> HashSet<ProductId> {
        let wanted: HashSet<String> = allergen_names
            .iter()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        if wanted.is_empty() {
            return HashSet::new();
        }

        self.allergens
            .iter()
            .filter(|assoc| wanted.contains(&assoc.allergen_name.trim().to_lowercase()))
            .map(|assoc| assoc.product_id)
            .collect()
    }

    /// Lower-cased names of ingredients flagged to avoid during pregnancy
    pub fn pregnancy_unsafe_ingredients(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .ingredients
            .iter()
            .filter(|ingredient| ingredient.avoid_during_pregnancy())
            .map(|ingredient| ingredient.name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
