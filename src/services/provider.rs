use async_trait::async_trait;

use crate::clients::tmdb::{
    SearchPage, TmdbClient, TmdbDetail, TmdbError, TmdbMultiResult, TmdbSummary,
};
use crate::models::media::MediaKind;

/// Port over the metadata provider. The engines depend on this trait
/// rather than the concrete client so tests can count and fail calls.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<SearchPage<TmdbSummary>, TmdbError>;

    /// Pages returned here carry only movie and tv entries; the
    /// implementation drops person results.
    async fn search_multi(&self, query: &str) -> Result<SearchPage<TmdbMultiResult>, TmdbError>;

    async fn details(&self, kind: MediaKind, tmdb_id: i32) -> Result<TmdbDetail, TmdbError>;
}

#[async_trait]
impl MediaProvider for TmdbClient {
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<SearchPage<TmdbSummary>, TmdbError> {
        Self::search(self, kind, query).await
    }

    async fn search_multi(&self, query: &str) -> Result<SearchPage<TmdbMultiResult>, TmdbError> {
        Self::search_multi(self, query).await
    }

    async fn details(&self, kind: MediaKind, tmdb_id: i32) -> Result<TmdbDetail, TmdbError> {
        Self::details(self, kind, tmdb_id).await
    }
}
