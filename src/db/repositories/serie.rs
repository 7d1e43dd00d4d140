use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::info;

use super::MediaRepository;
use crate::entities::{prelude::Series, series};
use crate::models::media::{MediaRecord, NewRecord};

pub struct SerieRepository {
    conn: DatabaseConnection,
}

impl SerieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_record(model: series::Model) -> MediaRecord {
        MediaRecord {
            id: model.id,
            title: model.title,
            tmdb_id: model.tmdb_id,
            rating: model.rating,
            wishlist: model.wishlist,
            review: model.review,
            view_count: model.view_count,
            watched: model.watched,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl MediaRepository for SerieRepository {
    async fn insert(&self, record: NewRecord) -> Result<MediaRecord, DbErr> {
        let now = Utc::now();
        let model = series::ActiveModel {
            title: Set(record.title),
            tmdb_id: Set(record.tmdb_id),
            rating: Set(record.rating),
            wishlist: Set(record.wishlist),
            review: Set(record.review),
            view_count: Set(record.view_count),
            watched: Set(record.watched),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!("created serie {} ('{}')", model.id, model.title);
        Ok(Self::to_record(model))
    }

    async fn update(&self, record: MediaRecord) -> Result<MediaRecord, DbErr> {
        let model = series::ActiveModel {
            id: Unchanged(record.id),
            title: Set(record.title),
            tmdb_id: Set(record.tmdb_id),
            rating: Set(record.rating),
            wishlist: Set(record.wishlist),
            review: Set(record.review),
            view_count: Set(record.view_count),
            watched: Set(record.watched),
            created_at: Unchanged(record.created_at),
            updated_at: Set(Utc::now()),
        }
        .update(&self.conn)
        .await?;

        Ok(Self::to_record(model))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MediaRecord>, DbErr> {
        let model = Series::find_by_id(id).one(&self.conn).await?;
        Ok(model.map(Self::to_record))
    }

    async fn find_by_tmdb_id(&self, tmdb_id: i32) -> Result<Option<MediaRecord>, DbErr> {
        let model = Series::find()
            .filter(series::Column::TmdbId.eq(tmdb_id))
            .one(&self.conn)
            .await?;
        Ok(model.map(Self::to_record))
    }

    async fn find_by_tmdb_ids(&self, tmdb_ids: &[i32]) -> Result<Vec<MediaRecord>, DbErr> {
        if tmdb_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = Series::find()
            .filter(series::Column::TmdbId.is_in(tmdb_ids.iter().copied()))
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::to_record).collect())
    }

    async fn find_all(&self) -> Result<Vec<MediaRecord>, DbErr> {
        let models = Series::find()
            .order_by_desc(series::Column::CreatedAt)
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::to_record).collect())
    }

    async fn find_wishlist(&self) -> Result<Vec<MediaRecord>, DbErr> {
        let models = Series::find()
            .filter(series::Column::Wishlist.eq(true))
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::to_record).collect())
    }

    async fn find_rated(&self) -> Result<Vec<MediaRecord>, DbErr> {
        let models = Series::find()
            .filter(series::Column::Rating.is_not_null())
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::to_record).collect())
    }

    async fn find_watched(&self) -> Result<Vec<MediaRecord>, DbErr> {
        let models = Series::find()
            .filter(series::Column::Watched.eq(true))
            .all(&self.conn)
            .await?;
        Ok(models.into_iter().map(Self::to_record).collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, DbErr> {
        let result = Series::delete_by_id(id).exec(&self.conn).await?;
        let removed = result.rows_affected > 0;
        if removed {
            info!("removed serie {}", id);
        }
        Ok(removed)
    }
}
