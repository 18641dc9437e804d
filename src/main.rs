use std::sync::Arc;

use skincare_recommender::{
    api::{cors_layer, create_router, AppState},
    catalog::load_catalog,
    config::Config,
    db::{create_pool, PgHistoryStore},
    services::{ConcernSynonyms, RecommendationEngine},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skincare_recommender=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let synonyms = match &config.concern_synonyms_path {
        Some(path) => ConcernSynonyms::from_json_file(path)?,
        None => ConcernSynonyms::default(),
    };

    // A missing or corrupt catalog keeps the server up in degraded mode
    let engine = match load_catalog(&config.data_dir) {
        Ok(catalog) => Some(RecommendationEngine::new(catalog, synonyms)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load catalog, recommendations unavailable");
            None
        }
    };

    let mut state = AppState::new(engine).with_default_top_n(config.default_top_n);

    if let Some(database_url) = &config.database_url {
        let pool = create_pool(database_url).await?;
        state = state.with_history(Arc::new(PgHistoryStore::new(pool)));
        tracing::info!("Recommendation history enabled");
    }

    let app = create_router(state).layer(cors_layer(&config.cors_origins));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
