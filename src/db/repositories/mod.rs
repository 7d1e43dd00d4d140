use async_trait::async_trait;
use sea_orm::DbErr;

use crate::models::media::{MediaRecord, NewRecord};

pub mod movie;
pub mod serie;

pub use movie::MovieRepository;
pub use serie::SerieRepository;

/// Store contract for one media kind. Implemented once per entity
/// (movies, series); everything above this trait is kind-generic.
///
/// The `tmdb_id` uniqueness constraint lives in the schema, not here:
/// `insert`/`update` surface a violation as the driver's unique
/// constraint error and callers map it.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn insert(&self, record: NewRecord) -> Result<MediaRecord, DbErr>;

    /// Persists every field of `record` except `id` and `created_at`,
    /// refreshing `updated_at`.
    async fn update(&self, record: MediaRecord) -> Result<MediaRecord, DbErr>;

    async fn find_by_id(&self, id: i64) -> Result<Option<MediaRecord>, DbErr>;

    async fn find_by_tmdb_id(&self, tmdb_id: i32) -> Result<Option<MediaRecord>, DbErr>;

    /// Bulk lookup for the search/merge engine; one query, not N.
    async fn find_by_tmdb_ids(&self, tmdb_ids: &[i32]) -> Result<Vec<MediaRecord>, DbErr>;

    /// All records, newest first.
    async fn find_all(&self) -> Result<Vec<MediaRecord>, DbErr>;

    async fn find_wishlist(&self) -> Result<Vec<MediaRecord>, DbErr>;

    async fn find_rated(&self) -> Result<Vec<MediaRecord>, DbErr>;

    async fn find_watched(&self) -> Result<Vec<MediaRecord>, DbErr>;

    /// Returns false when no row had this id.
    async fn delete(&self, id: i64) -> Result<bool, DbErr>;
}
