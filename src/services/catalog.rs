use sea_orm::{DbErr, SqlErr};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::enrichment::{EnrichedRecord, Enricher};
use super::provider::MediaProvider;
use crate::api::types::{SearchEntry, SearchEnvelope};
use crate::clients::tmdb::{TmdbDetail, TmdbError};
use crate::db::MediaRepository;
use crate::models::media::{
    CreateMedia, MediaKind, MediaRecord, NewRecord, TmdbOverrides, UpdateMedia, has_text,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} not found with id {id}")]
    NotFound { kind: MediaKind, id: i64 },

    #[error(transparent)]
    Tmdb(#[from] TmdbError),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Kind-generic catalog engine: reconciliation (create-or-update by
/// TMDB id), CRUD, enriched listings and the search/merge operation.
/// One instance per kind, all sharing the provider and its client pool.
pub struct CatalogService {
    kind: MediaKind,
    repo: Arc<dyn MediaRepository>,
    provider: Arc<dyn MediaProvider>,
    enricher: Enricher,
}

impl CatalogService {
    #[must_use]
    pub fn new(
        kind: MediaKind,
        repo: Arc<dyn MediaRepository>,
        provider: Arc<dyn MediaProvider>,
        enrich_concurrency: usize,
    ) -> Self {
        let enricher = Enricher::new(Arc::clone(&provider), enrich_concurrency);
        Self {
            kind,
            repo,
            provider,
            enricher,
        }
    }

    fn not_found(&self, id: i64) -> CatalogError {
        CatalogError::NotFound {
            kind: self.kind,
            id,
        }
    }

    /// The check-then-act upsert is not guarded against a concurrent
    /// insert for the same TMDB id; the loser hits the schema's unique
    /// constraint, which surfaces as a conflict instead of vanishing
    /// into a generic database error.
    fn map_db_err(&self, tmdb_id: Option<i32>, err: DbErr) -> CatalogError {
        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            let id = tmdb_id.map_or_else(|| "?".to_string(), |id| id.to_string());
            return CatalogError::Conflict(format!(
                "a {} with TMDB id {} already exists",
                self.kind, id
            ));
        }
        CatalogError::Database(err)
    }

    pub async fn create(&self, command: CreateMedia) -> Result<MediaRecord, CatalogError> {
        info!("creating {} '{}'", self.kind, command.title);
        let seed = NewRecord::from(command);
        let tmdb_id = seed.tmdb_id;
        self.repo
            .insert(seed)
            .await
            .map_err(|e| self.map_db_err(tmdb_id, e))
    }

    /// Upsert keyed on `(kind, tmdb_id)`. The provider lookup comes
    /// first: if it fails no local record is touched.
    pub async fn reconcile_from_tmdb(
        &self,
        tmdb_id: i32,
        overrides: TmdbOverrides,
    ) -> Result<MediaRecord, CatalogError> {
        info!("reconciling {} from TMDB id {}", self.kind, tmdb_id);
        let detail = self.provider.details(self.kind, tmdb_id).await?;

        if let Some(mut existing) = self.repo.find_by_tmdb_id(tmdb_id).await? {
            apply_overrides(&mut existing, &overrides);
            return self
                .repo
                .update(existing)
                .await
                .map_err(|e| self.map_db_err(Some(tmdb_id), e));
        }

        let title = overrides
            .title_override
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map_or_else(|| detail.display_title().to_string(), str::to_string);

        let seed = NewRecord {
            title,
            tmdb_id: Some(tmdb_id),
            rating: overrides.rating,
            wishlist: overrides.wishlist.unwrap_or(false),
            review: overrides.review,
            view_count: overrides.view_count.unwrap_or(0),
            watched: overrides.watched.unwrap_or(false),
        };
        self.repo
            .insert(seed)
            .await
            .map_err(|e| self.map_db_err(Some(tmdb_id), e))
    }

    pub async fn find_all(&self) -> Result<Vec<EnrichedRecord>, CatalogError> {
        let records = self.repo.find_all().await?;
        Ok(self.enricher.attach_posters(self.kind, records).await)
    }

    pub async fn find_wishlist(&self) -> Result<Vec<EnrichedRecord>, CatalogError> {
        let records = self.repo.find_wishlist().await?;
        Ok(self.enricher.attach_posters(self.kind, records).await)
    }

    pub async fn find_rated(&self) -> Result<Vec<EnrichedRecord>, CatalogError> {
        let records = self.repo.find_rated().await?;
        Ok(self.enricher.attach_posters(self.kind, records).await)
    }

    pub async fn find_watched(&self) -> Result<Vec<EnrichedRecord>, CatalogError> {
        let records = self.repo.find_watched().await?;
        Ok(self.enricher.attach_posters(self.kind, records).await)
    }

    /// Local record plus best-effort provider detail: a failed detail
    /// lookup is logged and degrades to no `tmdb` payload, it never
    /// fails the request.
    pub async fn find_one(
        &self,
        id: i64,
    ) -> Result<(MediaRecord, Option<TmdbDetail>), CatalogError> {
        let record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| self.not_found(id))?;

        let tmdb = match record.tmdb_id {
            Some(tmdb_id) => match self.provider.details(self.kind, tmdb_id).await {
                Ok(detail) => Some(detail),
                Err(err) => {
                    warn!(
                        "could not fetch TMDB details for {} {}: {}",
                        self.kind, id, err
                    );
                    None
                }
            },
            None => None,
        };

        Ok((record, tmdb))
    }

    /// Provider detail plus the matching local record when one exists.
    /// Unlike `find_one`, the provider failure propagates here.
    pub async fn find_by_tmdb_id(
        &self,
        tmdb_id: i32,
    ) -> Result<(TmdbDetail, Option<MediaRecord>), CatalogError> {
        let detail = self.provider.details(self.kind, tmdb_id).await?;
        let local = self.repo.find_by_tmdb_id(tmdb_id).await?;
        Ok((detail, local))
    }

    pub async fn update(
        &self,
        id: i64,
        command: UpdateMedia,
    ) -> Result<MediaRecord, CatalogError> {
        let mut record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| self.not_found(id))?;

        apply_update(&mut record, &command);
        let tmdb_id = record.tmdb_id;
        self.repo
            .update(record)
            .await
            .map_err(|e| self.map_db_err(tmdb_id, e))
    }

    /// Deletes the record and returns its last state.
    pub async fn remove(&self, id: i64) -> Result<MediaRecord, CatalogError> {
        let record = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| self.not_found(id))?;

        self.repo.delete(id).await?;
        Ok(record)
    }

    /// Provider search merged with the local catalog. Blank queries and
    /// null provider result lists short-circuit to an empty envelope;
    /// other provider failures propagate. `total` counts the truncated
    /// results, not TMDB's total matches.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<SearchEnvelope<SearchEntry>, CatalogError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(SearchEnvelope::empty(trimmed, limit));
        }

        info!(
            "searching {}s for '{}' (limit {})",
            self.kind, trimmed, limit
        );
        let page = self.provider.search(self.kind, trimmed).await?;
        let Some(results) = page.results else {
            return Ok(SearchEnvelope::empty(trimmed, limit));
        };

        let limited: Vec<_> = results.into_iter().take(limit).collect();

        let tmdb_ids: Vec<i32> = limited.iter().filter_map(|s| s.id).collect();
        let mut local_by_tmdb: HashMap<i32, MediaRecord> = self
            .repo
            .find_by_tmdb_ids(&tmdb_ids)
            .await?
            .into_iter()
            .filter_map(|record| record.tmdb_id.map(|id| (id, record)))
            .collect();

        let results: Vec<SearchEntry> = limited
            .into_iter()
            .map(|summary| {
                let title = summary.display_title().map(str::to_string);
                let local = summary.id.and_then(|id| local_by_tmdb.remove(&id));
                let (release_date, first_air_date) = match self.kind {
                    MediaKind::Movie => (summary.release_date, None),
                    MediaKind::Serie => (None, summary.first_air_date),
                };
                SearchEntry {
                    kind: self.kind.as_str(),
                    tmdb_id: summary.id,
                    title,
                    poster_path: summary.poster_path,
                    overview: summary.overview,
                    release_date,
                    first_air_date,
                    vote_average: summary.vote_average,
                    local,
                }
            })
            .collect();

        Ok(SearchEnvelope {
            query: trimmed.to_string(),
            limit,
            total: results.len(),
            results,
        })
    }
}

/// TMDB upsert override application: title and review only when
/// non-blank, the other fields whenever present.
fn apply_overrides(record: &mut MediaRecord, overrides: &TmdbOverrides) {
    if has_text(overrides.title_override.as_deref()) {
        record.title = overrides.title_override.clone().unwrap_or_default();
    }
    if let Some(rating) = overrides.rating {
        record.rating = Some(rating);
    }
    if let Some(wishlist) = overrides.wishlist {
        record.wishlist = wishlist;
    }
    if has_text(overrides.review.as_deref()) {
        record.review.clone_from(&overrides.review);
    }
    if let Some(view_count) = overrides.view_count {
        record.view_count = view_count;
    }
    if let Some(watched) = overrides.watched {
        record.watched = watched;
    }
}

fn apply_update(record: &mut MediaRecord, command: &UpdateMedia) {
    if has_text(command.title.as_deref()) {
        record.title = command.title.clone().unwrap_or_default();
    }
    if let Some(tmdb_id) = command.tmdb_id {
        record.tmdb_id = Some(tmdb_id);
    }
    if let Some(rating) = command.rating {
        record.rating = Some(rating);
    }
    if let Some(wishlist) = command.wishlist {
        record.wishlist = wishlist;
    }
    if has_text(command.review.as_deref()) {
        record.review.clone_from(&command.review);
    }
    if let Some(view_count) = command.view_count {
        record.view_count = view_count;
    }
    if let Some(watched) = command.watched {
        record.watched = watched;
    }
}
