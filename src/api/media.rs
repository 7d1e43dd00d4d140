use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::ApiError;
use super::types::{ListEnvelope, MediaDetail, SearchEntry, SearchEnvelope, TmdbLookup};
use super::validation::{
    validate_create, validate_overrides, validate_search_limit, validate_update,
};
use crate::models::media::{CreateMedia, MediaRecord, TmdbOverrides, UpdateMedia};
use crate::services::CatalogService;

/// One router per kind; the handlers never know which kind they serve.
pub fn routes<S>(service: Arc<CatalogService>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", post(create).get(list_all))
        .route("/wishlist", get(list_wishlist))
        .route("/rated", get(list_rated))
        .route("/watched", get(list_watched))
        .route("/search", get(search))
        .route("/tmdb", post(create_from_tmdb))
        .route("/tmdb/{tmdb_id}", get(tmdb_lookup))
        .route("/{id}", get(find_one).put(update).delete(remove))
        .with_state(service)
}

async fn create(
    State(service): State<Arc<CatalogService>>,
    Json(command): Json<CreateMedia>,
) -> Result<(StatusCode, Json<MediaRecord>), ApiError> {
    validate_create(&command)?;
    let record = service.create(command).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn create_from_tmdb(
    State(service): State<Arc<CatalogService>>,
    Json(command): Json<TmdbOverrides>,
) -> Result<(StatusCode, Json<MediaRecord>), ApiError> {
    let tmdb_id = validate_overrides(&command)?;
    let record = service.reconcile_from_tmdb(tmdb_id, command).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_all(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ListEnvelope>, ApiError> {
    let items = service.find_all().await?;
    Ok(Json(ListEnvelope { items, total: None }))
}

async fn list_wishlist(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ListEnvelope>, ApiError> {
    let items = service.find_wishlist().await?;
    Ok(Json(ListEnvelope { items, total: None }))
}

async fn list_watched(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ListEnvelope>, ApiError> {
    let items = service.find_watched().await?;
    Ok(Json(ListEnvelope { items, total: None }))
}

async fn list_rated(
    State(service): State<Arc<CatalogService>>,
) -> Result<Json<ListEnvelope>, ApiError> {
    let items = service.find_rated().await?;
    let total = Some(items.len());
    Ok(Json(ListEnvelope { items, total }))
}

#[derive(Debug, Deserialize)]
struct KindSearchParams {
    #[serde(default)]
    q: String,
    #[serde(default = "default_limit")]
    limit: i64,
}

const fn default_limit() -> i64 {
    20
}

async fn search(
    State(service): State<Arc<CatalogService>>,
    Query(params): Query<KindSearchParams>,
) -> Result<Json<SearchEnvelope<SearchEntry>>, ApiError> {
    let limit = validate_search_limit(params.limit)?;
    let envelope = service.search(&params.q, limit).await?;
    Ok(Json(envelope))
}

async fn tmdb_lookup(
    State(service): State<Arc<CatalogService>>,
    Path(tmdb_id): Path<i32>,
) -> Result<Json<TmdbLookup>, ApiError> {
    if tmdb_id <= 0 {
        return Err(ApiError::InvalidArgument(format!(
            "TMDB id must be positive, got {tmdb_id}"
        )));
    }
    let (tmdb, local) = service.find_by_tmdb_id(tmdb_id).await?;
    Ok(Json(TmdbLookup { tmdb, local }))
}

async fn find_one(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<i64>,
) -> Result<Json<MediaDetail>, ApiError> {
    let (record, tmdb) = service.find_one(id).await?;
    Ok(Json(MediaDetail { record, tmdb }))
}

async fn update(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<i64>,
    Json(command): Json<UpdateMedia>,
) -> Result<Json<MediaRecord>, ApiError> {
    validate_update(&command)?;
    let record = service.update(id, command).await?;
    Ok(Json(record))
}

async fn remove(
    State(service): State<Arc<CatalogService>>,
    Path(id): Path<i64>,
) -> Result<Json<MediaRecord>, ApiError> {
    let record = service.remove(id).await?;
    Ok(Json(record))
}
