use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;

/// Query used when the caller states no concerns
pub const DEFAULT_CONCERN_QUERY: &str = "hydrating soothing gentle";

const DEFAULT_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "acne",
        &["acne", "pimple", "blemish", "breakout", "salicylic acid", "niacinamide"],
    ),
    (
        "hydrating",
        &["hydrating", "moisturiz", "hyaluronic", "glycerin", "ceramide"],
    ),
    ("dry", &["dry", "dehydrated", "flaky", "ceramide"]),
    (
        "wrinkle",
        &["wrinkle", "fine line", "retinol", "peptide", "anti-aging"],
    ),
    (
        "pigmentation",
        &["pigment", "dark spot", "vitamin c", "niacinamide"],
    ),
    (
        "sensitive",
        &["sensitive", "calm", "soothe", "aloe", "centella"],
    ),
    ("puffiness", &["puff", "eye bag", "de-puff", "caffeine"]),
    ("dark circles", &["dark circle", "eye bag"]),
    (
        "uv protection",
        &["spf", "sunscreen", "broad spectrum", "uva", "uvb"],
    ),
    (
        "dullness",
        &["dull", "lack of radiance", "brightening", "radiance"],
    ),
];

/// Read-only mapping from a canonical concern to related catalog terms
#[derive(Debug, Clone, PartialEq)]
pub struct ConcernSynonyms {
    table: BTreeMap<String, Vec<String>>,
}

impl Default for ConcernSynonyms {
    fn default() -> Self {
        Self::new(
            DEFAULT_SYNONYMS
                .iter()
                .map(|(key, terms)| (key.to_string(), terms.iter().map(|t| t.to_string()).collect())),
        )
    }
}

impl ConcernSynonyms {
    /// Builds a table; keys are normalised to trimmed lower case
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let table = entries
            .into_iter()
            .map(|(key, terms)| (key.trim().to_lowercase(), terms))
            .collect();
        Self { table }
    }

    /// Loads a replacement table from a JSON object of `key -> [terms]`
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read concern synonyms {}", path.display()))?;
        let entries: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid concern synonyms in {}", path.display()))?;

        let synonyms = Self::new(entries);
        if synonyms.is_empty() {
            anyhow::bail!("concern synonyms in {} define no concerns", path.display());
        }
        tracing::info!(concerns = synonyms.len(), path = %path.display(), "Concern synonyms loaded");
        Ok(synonyms)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Expands concern labels into a single space-joined query
    ///
    /// Known concerns are replaced by their synonyms, unknown ones pass
    /// through verbatim. Terms are deduplicated and emitted in sorted order,
    /// so the output does not depend on the input order. Returns an empty
    /// string when no non-empty label was given.
    pub fn expand<S: AsRef<str>>(&self, concerns: &[S]) -> String {
        let mut terms: BTreeSet<String> = BTreeSet::new();

        for concern in concerns {
            let label = concern.as_ref().trim().to_lowercase();
            if label.is_empty() {
                continue;
            }
            match self.table.get(&label) {
                Some(synonyms) => terms.extend(synonyms.iter().cloned()),
                None => {
                    tracing::debug!(concern = %label, "Unknown concern, using label as-is");
                    terms.insert(label);
                }
            }
        }

        terms.into_iter().collect::<Vec<_>>().join(" ")
    }

    /// Expanded query for `concerns`, or the default phrase if there is none
    pub fn query_for<S: AsRef<str>>(&self, concerns: &[S]) -> String {
        let expanded = self.expand(concerns);
        if expanded.is_empty() {
            DEFAULT_CONCERN_QUERY.to_string()
        } else {
            expanded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_all_concerns() {
        let synonyms = ConcernSynonyms::default();
        assert_eq!(synonyms.len(), 10);
    }

    #[test]
    fn test_expand_known_concern() {
        let synonyms = ConcernSynonyms::default();
        assert_eq!(
            synonyms.expand(&["Acne"]),
            "acne blemish breakout niacinamide pimple salicylic acid"
        );
    }

    #[test]
    fn test_expand_is_order_independent() {
        let synonyms = ConcernSynonyms::default();
        let forward = synonyms.expand(&["acne", "pigmentation", "redness"]);
        let backward = synonyms.expand(&["redness", "pigmentation", "acne"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_expand_deduplicates_shared_terms() {
        let synonyms = ConcernSynonyms::default();
        let expanded = synonyms.expand(&["acne", "pigmentation"]);
        assert_eq!(expanded.matches("niacinamide").count(), 1);
    }

    #[test]
    fn test_unknown_concern_passes_through() {
        let synonyms = ConcernSynonyms::default();
        assert_eq!(synonyms.expand(&["  Rosacea "]), "rosacea");
        assert_eq!(synonyms.expand(&["acnee"]), "acnee");
    }

    #[test]
    fn test_multi_word_key_matches() {
        let synonyms = ConcernSynonyms::default();
        assert_eq!(synonyms.expand(&["Dark Circles"]), "dark circle eye bag");
    }

    #[test]
    fn test_query_falls_back_to_default() {
        let synonyms = ConcernSynonyms::default();
        let empty: [&str; 0] = [];
        assert_eq!(synonyms.query_for(&empty), DEFAULT_CONCERN_QUERY);
        assert_eq!(synonyms.query_for(&["", "  "]), DEFAULT_CONCERN_QUERY);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synonyms.json");
        std::fs::write(&path, r#"{"Oiliness": ["sebum", "shine"]}"#).unwrap();

        let synonyms = ConcernSynonyms::from_json_file(&path).unwrap();
        assert_eq!(synonyms.len(), 1);
        assert_eq!(synonyms.expand(&["oiliness"]), "sebum shine");
    }

    #[test]
    fn test_from_json_file_rejects_bad_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synonyms.json");
        std::fs::write(&path, r#"["acne"]"#).unwrap();
        assert!(ConcernSynonyms::from_json_file(&path).is_err());
    }

    #[test]
    fn test_from_json_file_rejects_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synonyms.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(ConcernSynonyms::from_json_file(&path).is_err());
    }
}
