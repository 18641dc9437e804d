use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Stable row key of a product in the catalog
pub type ProductId = u64;

/// Skin types the catalog carries a suitability flag for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinType {
    Dry,
    Oily,
    Normal,
    Combination,
    Sensitive,
}

impl SkinType {
    pub const ALL: [SkinType; 5] = [
        SkinType::Dry,
        SkinType::Oily,
        SkinType::Normal,
        SkinType::Combination,
        SkinType::Sensitive,
    ];

    /// Resolves a user-facing label such as "Oily Skin" (or just "oily")
    ///
    /// Matching is case-insensitive. Returns `None` for anything outside the
    /// fixed enumeration.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        let bare = normalized
            .strip_suffix("skin")
            .map(str::trim_end)
            .unwrap_or(&normalized);

        Self::ALL
            .into_iter()
            .find(|skin_type| skin_type.column().eq_ignore_ascii_case(bare))
    }

    /// Name of the catalog flag column for this skin type
    pub fn column(&self) -> &'static str {
        match self {
            SkinType::Dry => "Dry",
            SkinType::Oily => "Oily",
            SkinType::Normal => "Normal",
            SkinType::Combination => "Combination",
            SkinType::Sensitive => "Sensitive",
        }
    }
}

impl Display for SkinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Skin", self.column())
    }
}

/// Per-skin-type suitability flags of a product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinTypeFlags {
    pub dry: bool,
    pub oily: bool,
    pub normal: bool,
    pub combination: bool,
    pub sensitive: bool,
}

impl SkinTypeFlags {
    pub fn suits(&self, skin_type: SkinType) -> bool {
        match skin_type {
            SkinType::Dry => self.dry,
            SkinType::Oily => self.oily,
            SkinType::Normal => self.normal,
            SkinType::Combination => self.combination,
            SkinType::Sensitive => self.sensitive,
        }
    }
}

/// A skincare product from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Category label (e.g. "Moisturizer", "Cleanser")
    pub category: String,
    pub brand: String,
    pub name: String,
    /// Raw ingredient list as a single comma separated string
    pub ingredients: String,
    pub skin_types: SkinTypeFlags,
}

impl Product {
    pub fn suits(&self, skin_type: SkinType) -> bool {
        self.skin_types.suits(skin_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skin_type_from_quiz_label() {
        assert_eq!(SkinType::from_label("Oily Skin"), Some(SkinType::Oily));
        assert_eq!(
            SkinType::from_label("Combination Skin"),
            Some(SkinType::Combination)
        );
    }

    #[test]
    fn test_skin_type_from_bare_label_any_case() {
        assert_eq!(SkinType::from_label("dry"), Some(SkinType::Dry));
        assert_eq!(SkinType::from_label("  SENSITIVE skin "), Some(SkinType::Sensitive));
    }

    #[test]
    fn test_skin_type_unknown_label() {
        assert_eq!(SkinType::from_label("Unicorn Skin"), None);
        assert_eq!(SkinType::from_label(""), None);
        assert_eq!(SkinType::from_label("Skin"), None);
    }

    #[test]
    fn test_skin_type_display() {
        assert_eq!(format!("{}", SkinType::Normal), "Normal Skin");
    }

    #[test]
    fn test_flags_suits() {
        let flags = SkinTypeFlags {
            oily: true,
            sensitive: true,
            ..Default::default()
        };
        assert!(flags.suits(SkinType::Oily));
        assert!(flags.suits(SkinType::Sensitive));
        assert!(!flags.suits(SkinType::Dry));
    }
}
