use std::time::Instant;

use crate::{
    catalog::Catalog,
    models::{Recommendation, RecommendationOutcome, RecommendationRequest},
    services::{concerns::ConcernSynonyms, filters, search_text::composite_text, similarity::TfidfModel},
};

pub const NO_MATCHES_MESSAGE: &str = "No matches found for your filters.";
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Recommendation model is unavailable.";

/// Catalog, similarity model and synonym table, built once at startup
///
/// Nothing here is mutated after construction, so a single engine can be
/// shared across concurrently running requests.
#[derive(Debug)]
pub struct RecommendationEngine {
    catalog: Catalog,
    model: Option<TfidfModel>,
    synonyms: ConcernSynonyms,
}

impl RecommendationEngine {
    /// Indexes the catalog's composite texts
    ///
    /// A catalog that cannot be vectorized still yields an engine; it simply
    /// answers every request with an empty result.
    pub fn new(catalog: Catalog, synonyms: ConcernSynonyms) -> Self {
        let corpus: Vec<String> = catalog.products().iter().map(composite_text).collect();

        let model = match TfidfModel::fit(&corpus) {
            Ok(model) => Some(model),
            Err(e) => {
                tracing::error!(error = %e, products = catalog.len(), "Failed to fit similarity model");
                None
            }
        };

        Self {
            catalog,
            model,
            synonyms,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn model_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Number of terms the similarity model indexes, 0 when it failed to fit
    pub fn vocabulary_size(&self) -> usize {
        self.model.as_ref().map_or(0, TfidfModel::vocabulary_size)
    }

    /// Filters, scores and ranks the catalog for one request
    ///
    /// Filtering is a hard gate: only products surviving every filter stage
    /// are ever scored or returned. Ties keep catalog order.
    pub fn recommend(&self, request: &RecommendationRequest) -> RecommendationOutcome {
        let start = Instant::now();

        let Some(model) = &self.model else {
            return RecommendationOutcome::empty(MODEL_UNAVAILABLE_MESSAGE);
        };

        let candidates = filters::apply(&self.catalog, request);
        if candidates.is_empty() {
            tracing::info!("No candidates left after filtering");
            return RecommendationOutcome::empty(NO_MATCHES_MESSAGE);
        }

        let query = self.synonyms.query_for(&request.concerns);
        let scores = model.score(&query, &candidates);

        let mut ranked: Vec<(usize, f64)> = candidates.into_iter().zip(scores).collect();
        // sort_by is stable, equal scores stay in catalog order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(request.top_n);

        let results: Vec<Recommendation> = ranked
            .into_iter()
            .filter_map(|(index, score)| {
                self.catalog.product(index).map(|product| Recommendation {
                    category: product.category.clone(),
                    brand: product.brand.clone(),
                    name: product.name.clone(),
                    score,
                })
            })
            .collect();

        tracing::info!(
            query = %query,
            results = results.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Recommendations ranked"
        );

        if results.is_empty() {
            return RecommendationOutcome::empty(NO_MATCHES_MESSAGE);
        }

        RecommendationOutcome {
            results,
            message: None,
        }
    }
}
