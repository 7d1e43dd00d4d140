use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two media kinds the catalog tracks. Every kind-specific detail
/// (route prefix, TMDB path segment, search entry shape) hangs off this
/// enum so the engines are written once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Movie,
    Serie,
}

impl MediaKind {
    /// Literal used in search result entries and route prefixes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Serie => "serie",
        }
    }

    /// Path segment TMDB uses for this kind (`/search/tv`, `/tv/{id}`).
    #[must_use]
    pub const fn tmdb_path(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Serie => "tv",
        }
    }

}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's local tracking entry for one movie or series.
///
/// Serialises camelCase to match the public API payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: i64,
    pub title: String,
    pub tmdb_id: Option<i32>,
    pub rating: Option<f32>,
    pub wishlist: bool,
    pub review: Option<String>,
    pub view_count: i32,
    pub watched: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Seed for a record about to be persisted; defaults already applied.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub title: String,
    pub tmdb_id: Option<i32>,
    pub rating: Option<f32>,
    pub wishlist: bool,
    pub review: Option<String>,
    pub view_count: i32,
    pub watched: bool,
}

/// Command for manual record creation (`POST /movie`, `POST /serie`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedia {
    pub title: String,
    #[serde(default)]
    pub tmdb_id: Option<i32>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub wishlist: Option<bool>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub view_count: Option<i32>,
    #[serde(default)]
    pub watched: Option<bool>,
}

impl From<CreateMedia> for NewRecord {
    fn from(command: CreateMedia) -> Self {
        Self {
            title: command.title,
            tmdb_id: command.tmdb_id,
            rating: command.rating,
            wishlist: command.wishlist.unwrap_or(false),
            review: command.review,
            view_count: command.view_count.unwrap_or(0),
            watched: command.watched.unwrap_or(false),
        }
    }
}

/// Command for the TMDB upsert (`POST /movie/tmdb`, `POST /serie/tmdb`).
/// `tmdb_id` is required; its absence is reported as a field-level
/// validation failure, so it stays optional at the deserialisation layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TmdbOverrides {
    #[serde(default)]
    pub tmdb_id: Option<i32>,
    #[serde(default)]
    pub title_override: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub wishlist: Option<bool>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub view_count: Option<i32>,
    #[serde(default)]
    pub watched: Option<bool>,
}

/// Partial update command (`PUT /movie/{id}`). Only present fields
/// overwrite; blank title/review are ignored rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedia {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<i32>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub wishlist: Option<bool>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub view_count: Option<i32>,
    #[serde(default)]
    pub watched: Option<bool>,
}

/// True for a `Some` holding at least one non-whitespace character.
#[must_use]
pub fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_mappings() {
        assert_eq!(MediaKind::Movie.as_str(), "movie");
        assert_eq!(MediaKind::Serie.as_str(), "serie");
        assert_eq!(MediaKind::Movie.tmdb_path(), "movie");
        assert_eq!(MediaKind::Serie.tmdb_path(), "tv");
    }

    #[test]
    fn create_command_defaults() {
        let command = CreateMedia {
            title: "Heat".to_string(),
            tmdb_id: None,
            rating: None,
            wishlist: None,
            review: None,
            view_count: None,
            watched: None,
        };
        let seed = NewRecord::from(command);
        assert!(!seed.wishlist);
        assert!(!seed.watched);
        assert_eq!(seed.view_count, 0);
    }

    #[test]
    fn has_text_rejects_blank() {
        assert!(has_text(Some("ok")));
        assert!(!has_text(Some("   ")));
        assert!(!has_text(Some("")));
        assert!(!has_text(None));
    }

    #[test]
    fn record_serialises_camel_case() {
        let record = MediaRecord {
            id: 1,
            title: "Heat".to_string(),
            tmdb_id: Some(949),
            rating: Some(4.5),
            wishlist: false,
            review: None,
            view_count: 2,
            watched: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tmdbId"], 949);
        assert_eq!(json["viewCount"], 2);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("tmdb_id").is_none());
    }
}
