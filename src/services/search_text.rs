use crate::models::Product;

/// Repetitions of each field in the composite text
pub const INGREDIENT_WEIGHT: usize = 3;
pub const CATEGORY_WEIGHT: usize = 2;
pub const BRAND_WEIGHT: usize = 1;
pub const NAME_WEIGHT: usize = 1;

/// Builds the composite string a product is indexed under
///
/// Ingredients, category, brand and name are repeated 3:2:1:1 and joined
/// by single spaces in that order. Repetition inflates term frequency so
/// ingredient content pulls hardest on similarity. Empty fields contribute
/// nothing.
pub fn composite_text(product: &Product) -> String {
    weighted_text(&[
        (product.ingredients.as_str(), INGREDIENT_WEIGHT),
        (product.category.as_str(), CATEGORY_WEIGHT),
        (product.brand.as_str(), BRAND_WEIGHT),
        (product.name.as_str(), NAME_WEIGHT),
    ])
}

fn weighted_text(fields: &[(&str, usize)]) -> String {
    fields
        .iter()
        .map(|(text, weight)| (text.trim(), *weight))
        .filter(|(text, _)| !text.is_empty())
        .flat_map(|(text, weight)| std::iter::repeat(text).take(weight))
        .collect::<Vec<_>>()
        .join(" ")
}
