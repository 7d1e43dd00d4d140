use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::AppState;
use super::error::ApiError;
use super::types::{SearchEntry, SearchEnvelope};
use super::validation::clamp_search_limit;
use crate::models::media::MediaKind;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

const fn default_limit() -> i64 {
    20
}

/// Cross-kind search over TMDB's multi index. The provider drops
/// person entries before the page gets here; out-of-range limits are
/// clamped rather than rejected.
pub async fn search_multi(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchEnvelope<SearchEntry>>, ApiError> {
    let limit = clamp_search_limit(params.limit);
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Json(SearchEnvelope::empty(query, limit)));
    }

    let page = state
        .provider
        .search_multi(query)
        .await
        .map_err(|e| ApiError::TmdbUnavailable(e.to_string()))?;

    let Some(results) = page.results else {
        return Ok(Json(SearchEnvelope::empty(query, limit)));
    };

    let limited: Vec<_> = results.into_iter().take(limit).collect();

    let entries: Vec<SearchEntry> = limited
        .into_iter()
        .map(|result| {
            let kind = if result.media_type.as_deref() == Some("tv") {
                MediaKind::Serie
            } else {
                MediaKind::Movie
            };
            let title = result.display_title().map(str::to_string);
            SearchEntry {
                kind: kind.as_str(),
                tmdb_id: result.id,
                title,
                poster_path: result.poster_path,
                overview: result.overview,
                release_date: result.release_date,
                first_air_date: result.first_air_date,
                vote_average: result.vote_average,
                local: None,
            }
        })
        .collect();

    Ok(Json(SearchEnvelope {
        query: query.to_string(),
        limit,
        total: entries.len(),
        results: entries,
    }))
}
