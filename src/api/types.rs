use serde::Serialize;

use crate::clients::tmdb::TmdbDetail;
use crate::models::media::MediaRecord;
use crate::services::EnrichedRecord;

/// Collection envelope. `total` is only present on the rated listing.
#[derive(Debug, Serialize)]
pub struct ListEnvelope {
    pub items: Vec<EnrichedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchEnvelope<T> {
    pub query: String,
    pub limit: usize,
    pub total: usize,
    pub results: Vec<T>,
}

impl<T> SearchEnvelope<T> {
    #[must_use]
    pub fn empty(query: &str, limit: usize) -> Self {
        Self {
            query: query.to_string(),
            limit,
            total: 0,
            results: Vec::new(),
        }
    }
}

/// One merged search hit: the provider summary plus the matching local
/// record, `null` when the title is not in the catalog. Exactly one of
/// `release_date` and `first_air_date` is emitted, per kind.
#[derive(Debug, Serialize)]
pub struct SearchEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "tmdbId")]
    pub tmdb_id: Option<i32>,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    pub vote_average: Option<f32>,
    pub local: Option<MediaRecord>,
}

/// Single-record response with best-effort provider detail.
#[derive(Debug, Serialize)]
pub struct MediaDetail {
    #[serde(flatten)]
    pub record: MediaRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<TmdbDetail>,
}

/// Provider-first lookup: the detail payload plus the local record
/// when the title is already tracked.
#[derive(Debug, Serialize)]
pub struct TmdbLookup {
    pub tmdb: TmdbDetail,
    pub local: Option<MediaRecord>,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub timestamp: String,
    pub status: &'static str,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_omits_total_when_absent() {
        let envelope = ListEnvelope {
            items: Vec::new(),
            total: None,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("total").is_none());

        let envelope = ListEnvelope {
            items: Vec::new(),
            total: Some(3),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["total"], 3);
    }

    #[test]
    fn search_entry_keeps_null_local_and_renames_type() {
        let entry = SearchEntry {
            kind: "movie",
            tmdb_id: Some(603),
            title: Some("The Matrix".to_string()),
            poster_path: None,
            overview: None,
            release_date: Some("1999-03-31".to_string()),
            first_air_date: None,
            vote_average: Some(8.2),
            local: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "movie");
        assert_eq!(json["tmdbId"], 603);
        assert!(json["local"].is_null());
        assert_eq!(json["release_date"], "1999-03-31");
        assert!(json.get("first_air_date").is_none());
    }
}
