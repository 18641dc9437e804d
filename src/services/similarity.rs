use std::collections::{BTreeMap, HashMap, HashSet};

use super::stop_words::is_stop_word;

/// Minimum number of distinct documents a term must appear in
pub const MIN_DOCUMENT_FREQUENCY: usize = 2;

/// Longest n-gram extracted by the analyzer
pub const MAX_NGRAM: usize = 2;

/// Sparse vector as (column, weight) pairs sorted by column
pub type SparseVector = Vec<(usize, f64)>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("cannot fit a similarity model on an empty corpus")]
    EmptyCorpus,

    #[error("empty vocabulary; the documents may only contain stop words")]
    EmptyVocabulary,

    #[error("no term appears in at least {min_df} documents")]
    NoTermsAfterPruning { min_df: usize },
}

/// Immutable TF-IDF model fit once over a corpus
///
/// The analyzer lower-cases, extracts word tokens of at least two characters,
/// drops English stop words and emits unigrams plus bigrams. Only terms found
/// in at least [`MIN_DOCUMENT_FREQUENCY`] documents enter the vocabulary. IDF
/// is smoothed (`ln((1 + n) / (1 + df)) + 1`) and rows are L2-normalised, so
/// cosine similarity reduces to a dot product.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
}

impl TfidfModel {
    /// Builds the vocabulary, IDF weights and one normalised row per document
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Result<Self, ModelError> {
        if corpus.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }

        let analyzed: Vec<Vec<String>> = corpus.iter().map(|doc| analyze(doc.as_ref())).collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &analyzed {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(ModelError::EmptyVocabulary);
        }

        // BTreeMap iteration gives columns in sorted term order
        let n_docs = corpus.len() as f64;
        let mut vocabulary = HashMap::new();
        let mut idf = Vec::new();
        for (term, df) in doc_freq {
            if df < MIN_DOCUMENT_FREQUENCY {
                continue;
            }
            vocabulary.insert(term.to_string(), idf.len());
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
        }

        if vocabulary.is_empty() {
            return Err(ModelError::NoTermsAfterPruning {
                min_df: MIN_DOCUMENT_FREQUENCY,
            });
        }

        let mut model = Self {
            vocabulary,
            idf,
            rows: Vec::with_capacity(analyzed.len()),
        };
        model.rows = analyzed.iter().map(|terms| model.vectorize(terms)).collect();

        tracing::info!(
            documents = model.rows.len(),
            vocabulary = model.vocabulary.len(),
            "Similarity model fitted"
        );

        Ok(model)
    }

    pub fn num_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&column| self.idf[column])
    }

    /// Stored row for a document
    pub fn row(&self, document: usize) -> Option<&SparseVector> {
        self.rows.get(document)
    }

    /// Projects text into the model's space; unseen terms are dropped
    pub fn transform(&self, text: &str) -> SparseVector {
        self.vectorize(&analyze(text))
    }

    /// Cosine similarity of `query` against each candidate document
    ///
    /// Scores are returned in candidate order and lie in [0, 1]. Unknown
    /// document indices and queries without shared terms score 0.
    pub fn score(&self, query: &str, candidates: &[usize]) -> Vec<f64> {
        let query_vector = self.transform(query);
        if query_vector.is_empty() {
            tracing::debug!(query = %query, "Query shares no terms with the vocabulary");
        }

        candidates
            .iter()
            .map(|&document| {
                self.rows
                    .get(document)
                    .map(|row| dot(&query_vector, row).clamp(0.0, 1.0))
                    .unwrap_or(0.0)
            })
            .collect()
    }

    fn vectorize(&self, terms: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms {
            if let Some(&column) = self.vocabulary.get(term) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(column, count)| (column, count * self.idf[column]))
            .collect();
        normalize(&mut vector);
        vector
    }
}

/// Lower-cased unigrams and bigrams of `text` with stop words removed
pub fn analyze(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms = tokens.clone();
    for n in 2..=MAX_NGRAM {
        terms.extend(tokens.windows(n).map(|gram| gram.join(" ")));
    }
    terms
}

/// Word tokens of two or more characters, minus stop words
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

fn normalize(vector: &mut SparseVector) {
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in vector.iter_mut() {
            *weight /= norm;
        }
    }
}

/// Dot product of two column-sorted sparse vectors
fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
