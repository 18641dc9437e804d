use crate::catalog::Catalog;
use crate::models::{Product, RecommendationRequest, SkinType};

/// Runs every stage for `request` over the whole catalog
///
/// Stages run in a fixed order (skin type, category, allergens, pregnancy
/// safety), each on the previous output, and can only remove candidates.
/// Candidates are catalog positions.
pub fn apply(catalog: &Catalog, request: &RecommendationRequest) -> Vec<usize> {
    let all: Vec<usize> = (0..catalog.len()).collect();
    let total = all.len();

    let candidates = by_skin_type(catalog, all, request.skin_type.as_deref());
    let candidates = by_category(catalog, candidates, request.product_type.as_deref());
    let candidates = without_allergens(catalog, candidates, &request.allergens);
    let candidates = if request.pregnancy_safe {
        pregnancy_safe(catalog, candidates)
    } else {
        candidates
    };

    tracing::debug!(
        total,
        remaining = candidates.len(),
        "Filter pipeline finished"
    );

    candidates
}

/// Keeps products flagged for the given skin type
///
/// Labels outside the known skin types leave the candidates untouched.
pub fn by_skin_type(catalog: &Catalog, candidates: Vec<usize>, label: Option<&str>) -> Vec<usize> {
    let Some(label) = label.filter(|l| !l.trim().is_empty()) else {
        return candidates;
    };

    let Some(skin_type) = SkinType::from_label(label) else {
        tracing::warn!(skin_type = %label, "Unknown skin type, skipping skin type filter");
        return candidates;
    };

    tracing::debug!(skin_type = %skin_type, "Applying skin type filter");
    retain(catalog, candidates, "skin_type", |product| product.suits(skin_type))
}

/// Splits a product type filter on commas and slashes
///
/// Tokens are trimmed and lower-cased; empty tokens are dropped.
pub fn parse_product_types(product_type: &str) -> Vec<String> {
    product_type
        .split([',', '/'])
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Keeps products whose category contains any requested type
pub fn by_category(
    catalog: &Catalog,
    candidates: Vec<usize>,
    product_type: Option<&str>,
) -> Vec<usize> {
    let Some(product_type) = product_type else {
        return candidates;
    };

    let types = parse_product_types(product_type);
    if types.is_empty() {
        tracing::warn!(product_type = %product_type, "Empty product type filter, skipping");
        return candidates;
    }

    retain(catalog, candidates, "category", |product| {
        let category = product.category.to_lowercase();
        types.iter().any(|t| category.contains(t.as_str()))
    })
}

/// Drops products associated with any of the named allergens
pub fn without_allergens(catalog: &Catalog, candidates: Vec<usize>, allergens: &[String]) -> Vec<usize> {
    if allergens.is_empty() {
        return candidates;
    }

    let excluded = catalog.products_with_allergens(allergens);
    retain(catalog, candidates, "allergens", |product| !excluded.contains(&product.id))
}

/// Drops products listing an ingredient flagged to avoid during pregnancy
///
/// Matching is a plain case-insensitive substring test on the ingredient
/// text, so a flagged name inside a longer ingredient name also excludes.
pub fn pregnancy_safe(catalog: &Catalog, candidates: Vec<usize>) -> Vec<usize> {
    let unsafe_names = catalog.pregnancy_unsafe_ingredients();
    if unsafe_names.is_empty() {
        return candidates;
    }

    retain(catalog, candidates, "pregnancy", |product| {
        let ingredients = product.ingredients.to_lowercase();
        !unsafe_names.iter().any(|name| ingredients.contains(name.as_str()))
    })
}

fn retain<F>(catalog: &Catalog, candidates: Vec<usize>, stage: &'static str, keep: F) -> Vec<usize>
where
    F: Fn(&Product) -> bool,
{
    let before = candidates.len();
    let kept: Vec<usize> = candidates
        .into_iter()
        .filter(|&index| catalog.product(index).is_some_and(&keep))
        .collect();

    tracing::debug!(stage, before, after = kept.len(), "Filter stage applied");
    kept
}
