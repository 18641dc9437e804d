use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    db::HistoryStore,
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{HistoryEntry, IngredientReference, RecommendationOutcome, RecommendationRequest},
    services::RecommendationEngine,
};

use super::AppState;

// Request/Response types

/// Query string of the recommend endpoint
///
/// Every field is taken as raw text so malformed values degrade to
/// "no filter" instead of rejecting the request.
#[derive(Debug, Default)]
pub struct RecommendQuery {
    pub skin_type: Option<String>,
    pub product_type: Option<String>,
    /// Comma separated concerns
    pub concerns: Option<String>,
    /// Comma separated allergen names
    pub allergens_list: Option<String>,
    /// "yes", "true" or "1" enables the filter
    pub pregnancy_safe: Option<String>,
    pub top_n: Option<String>,
    /// When set, the session is stored in the history
    pub user_id: Option<String>,
}

impl RecommendQuery {
    /// Collects known parameters from raw query pairs
    ///
    /// A repeated key keeps its last value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "skin_type" => &mut query.skin_type,
                "product_type" => &mut query.product_type,
                "concerns" => &mut query.concerns,
                "allergens_list" => &mut query.allergens_list,
                "pregnancy_safe" => &mut query.pregnancy_safe,
                "top_n" => &mut query.top_n,
                "user_id" => &mut query.user_id,
                _ => continue,
            };
            *slot = Some(value);
        }
        query
    }

    pub fn into_request(self, default_top_n: usize) -> RecommendationRequest {
        RecommendationRequest {
            skin_type: non_empty(self.skin_type),
            product_type: non_empty(self.product_type),
            concerns: split_list(self.concerns.as_deref()),
            allergens: split_list(self.allergens_list.as_deref()),
            pregnancy_safe: parse_flag(self.pregnancy_safe.as_deref()),
            top_n: parse_top_n(self.top_n.as_deref(), default_top_n),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw.map(|v| matches!(v.trim().to_lowercase().as_str(), "yes" | "true" | "1"))
        .unwrap_or(false)
}

/// Missing, negative or unparseable counts fall back to the default
fn parse_top_n(raw: Option<&str>, default_top_n: usize) -> usize {
    match raw.map(|v| v.trim().parse::<i64>()) {
        Some(Ok(n)) if n >= 0 => usize::try_from(n).unwrap_or(default_top_n),
        Some(_) => {
            tracing::warn!(top_n = ?raw, "Invalid top_n, using default");
            default_top_n
        }
        None => default_top_n,
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientSummary {
    pub name: String,
    pub what_is_it: String,
}

impl From<&IngredientReference> for IngredientSummary {
    fn from(ingredient: &IngredientReference) -> Self {
        Self {
            name: ingredient.name.clone(),
            what_is_it: ingredient.what_is_it.clone(),
        }
    }
}

fn engine(state: &AppState) -> AppResult<&Arc<RecommendationEngine>> {
    state
        .engine
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Product catalog is not loaded".to_string()))
}

fn history(state: &AppState) -> AppResult<&Arc<dyn HistoryStore>> {
    state
        .history
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Recommendation history is not configured".to_string()))
}

// Handlers

/// Root banner
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Skincare recommender API is running" }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let (products, model_ready, vocabulary_size) = state
        .engine
        .as_ref()
        .map(|engine| {
            (
                engine.catalog().len(),
                engine.model_ready(),
                engine.vocabulary_size(),
            )
        })
        .unwrap_or((0, false, 0));

    Json(json!({
        "status": "healthy",
        "products": products,
        "model_ready": model_ready,
        "vocabulary_size": vocabulary_size,
    }))
}

/// Ranks products for the quiz answers in the query string
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<RecommendationOutcome>> {
    let engine = engine(&state)?;
    let query = RecommendQuery::from_pairs(pairs);
    let user_id = non_empty(query.user_id.clone());
    let request = query.into_request(state.default_top_n);

    tracing::info!(
        request_id = %request_id,
        skin_type = ?request.skin_type,
        product_type = ?request.product_type,
        concerns = request.concerns.len(),
        allergens = request.allergens.len(),
        pregnancy_safe = request.pregnancy_safe,
        top_n = request.top_n,
        "Processing recommendation request"
    );

    let outcome = engine.recommend(&request);

    if let (Some(user_id), Some(store)) = (user_id, state.history.as_ref()) {
        let entry = HistoryEntry::new(user_id, request, outcome.results.clone());
        if let Err(e) = store.save(&entry).await {
            tracing::error!(request_id = %request_id, error = %e, "Failed to save recommendation history");
        }
    }

    Ok(Json(outcome))
}

/// Ingredient reference list (name and short description)
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<IngredientSummary>>> {
    let engine = engine(&state)?;
    let ingredients = engine
        .catalog()
        .ingredients()
        .iter()
        .map(IngredientSummary::from)
        .collect();
    Ok(Json(ingredients))
}

/// Past sessions of a user, most recent first
pub async fn list_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let entries = history(&state)?.list_for_user(&user_id).await?;
    Ok(Json(entries))
}

/// A single past session
pub async fn get_history_entry(
    State(state): State<AppState>,
    Path((user_id, entry_id)): Path<(String, Uuid)>,
) -> AppResult<Json<HistoryEntry>> {
    history(&state)?
        .get(&user_id, entry_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("History entry {} not found", entry_id)))
}
