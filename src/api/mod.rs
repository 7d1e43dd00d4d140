use axum::{Router, http::HeaderValue, middleware, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod error;
mod info;
mod media;
mod search;
pub mod types;
mod validation;

pub use error::ApiError;

use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::models::media::MediaKind;
use crate::services::{CatalogService, MediaProvider};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub provider: Arc<dyn MediaProvider>,

    pub movies: Arc<CatalogService>,

    pub series: Arc<CatalogService>,

    pub start_time: std::time::Instant,
}

pub async fn create_app_state(config: Config) -> anyhow::Result<AppState> {
    let provider: Arc<dyn MediaProvider> = Arc::new(TmdbClient::new(&config.tmdb)?);
    create_app_state_with_provider(config, provider).await
}

/// Same wiring with the provider swapped out, for tests that stub TMDB.
pub async fn create_app_state_with_provider(
    config: Config,
    provider: Arc<dyn MediaProvider>,
) -> anyhow::Result<AppState> {
    let store = Store::with_pool_options(
        &config.database.path,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    let concurrency = config.tmdb.enrich_concurrency;
    let movies = Arc::new(CatalogService::new(
        MediaKind::Movie,
        Arc::new(store.movies()),
        Arc::clone(&provider),
        concurrency,
    ));
    let series = Arc::new(CatalogService::new(
        MediaKind::Serie,
        Arc::new(store.series()),
        Arc::clone(&provider),
        concurrency,
    ));

    Ok(AppState {
        config: Arc::new(config),
        store,
        provider,
        movies,
        series,
        start_time: std::time::Instant::now(),
    })
}

pub fn router(state: AppState) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();
    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/", get(info::service_info))
        .route("/search", get(search::search_multi))
        .nest("/movie", media::routes(Arc::clone(&state.movies)))
        .nest("/serie", media::routes(Arc::clone(&state.series)))
        .fallback(error::endpoint_not_found)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(error::error_envelope))
}
