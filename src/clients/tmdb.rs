use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::TmdbConfig;
use crate::models::media::MediaKind;

/// Single failure kind for every TMDB problem: transport errors,
/// non-2xx statuses, undecodable bodies and empty detail payloads all
/// collapse into it. Callers decide whether to propagate or tolerate.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("TMDB request failed: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for TmdbError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unavailable(err.without_url().to_string())
    }
}

/// One page of TMDB search results. `results` stays optional so a null
/// list in the payload is distinguishable from an empty one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage<T> {
    #[serde(default)]
    pub page: Option<i32>,
    #[serde(default)]
    pub results: Option<Vec<T>>,
    #[serde(default)]
    pub total_pages: Option<i32>,
    #[serde(default)]
    pub total_results: Option<i32>,
}

impl<T> SearchPage<T> {
    #[must_use]
    pub fn result_count(&self) -> usize {
        self.results.as_ref().map_or(0, Vec::len)
    }
}

impl SearchPage<TmdbMultiResult> {
    /// Drops person entries so a multi page only carries titles.
    #[must_use]
    pub fn retain_titles(mut self) -> Self {
        if let Some(results) = self.results.take() {
            self.results = Some(results.into_iter().filter(TmdbMultiResult::is_title).collect());
        }
        self
    }
}

/// Item of a kind-specific search page. Movies carry `title` and
/// `release_date`, series carry `name` and `first_air_date`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbSummary {
    pub id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
}

impl TmdbSummary {
    /// Title for movies, name for series.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }
}

/// Item of a multi search page; `media_type` discriminates the kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbMultiResult {
    pub id: Option<i32>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

impl TmdbMultiResult {
    /// Multi search also returns people; only movies and series are titles.
    #[must_use]
    pub fn is_title(&self) -> bool {
        matches!(self.media_type.as_deref(), Some("movie" | "tv"))
    }

    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.name.as_deref())
    }
}

/// Full detail payload for one title. One struct covers both the movie
/// and tv shapes; kind-specific fields are simply absent for the other
/// kind. Never persisted, fetched fresh per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmdbDetail {
    pub id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub number_of_seasons: Option<i32>,
    #[serde(default)]
    pub number_of_episodes: Option<i32>,
    #[serde(default)]
    pub episode_run_time: Option<Vec<i32>>,
    #[serde(default)]
    pub genres: Option<Vec<TmdbGenre>>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub vote_count: Option<i32>,
    #[serde(default)]
    pub created_by: Option<Vec<TmdbCreator>>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
}

impl TmdbDetail {
    /// Title for movies, name for series; empty when TMDB sent neither.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbGenre {
    pub id: Option<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCreator {
    pub id: Option<i32>,
    pub name: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Option<Vec<TmdbCastMember>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCastMember {
    pub id: Option<i32>,
    pub name: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Outbound TMDB client. Every request carries the bearer credential and
/// an `Accept: application/json` header; no retries, callers decide
/// tolerance. Connect/read timeouts come from config (default 30s).
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> anyhow::Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.bearer_token))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.request_timeout_seconds);
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent("cinarr/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TmdbError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(TmdbError::Unavailable(format!(
                "TMDB returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Kind-specific title search (`/search/movie` or `/search/tv`).
    pub async fn search(
        &self,
        kind: MediaKind,
        query: &str,
    ) -> Result<SearchPage<TmdbSummary>, TmdbError> {
        let url = format!(
            "{}/search/{}?query={}&language={}",
            self.base_url,
            kind.tmdb_path(),
            urlencoding::encode(query),
            self.language
        );

        let page: SearchPage<TmdbSummary> = self.get_json(&url).await?;
        debug!(
            "TMDB returned {} {} results for '{}'",
            page.result_count(),
            kind,
            query
        );
        Ok(page)
    }

    /// Multi search across movies, series and people; people are dropped
    /// before the page is returned.
    pub async fn search_multi(&self, query: &str) -> Result<SearchPage<TmdbMultiResult>, TmdbError> {
        let url = format!(
            "{}/search/multi?query={}&language={}",
            self.base_url,
            urlencoding::encode(query),
            self.language
        );

        let page: SearchPage<TmdbMultiResult> = self.get_json(&url).await?;
        let page = page.retain_titles();

        debug!(
            "TMDB returned {} multi results for '{}'",
            page.result_count(),
            query
        );
        Ok(page)
    }

    /// Full detail lookup with credits appended. An empty payload (no
    /// `id`) is reported the same way as a transport failure.
    pub async fn details(&self, kind: MediaKind, tmdb_id: i32) -> Result<TmdbDetail, TmdbError> {
        let url = format!(
            "{}/{}/{}?append_to_response=credits&language={}",
            self.base_url,
            kind.tmdb_path(),
            tmdb_id,
            self.language
        );

        let detail: TmdbDetail = self.get_json(&url).await?;
        if detail.id.is_none() {
            return Err(TmdbError::Unavailable(format!(
                "TMDB returned an empty payload for {kind} {tmdb_id}"
            )));
        }

        debug!("fetched TMDB details for {}: {}", kind, detail.display_title());
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_detail_deserialises() {
        let payload = r#"{
            "id": 603,
            "title": "Matrix",
            "overview": "Un pirate informatique...",
            "release_date": "1999-03-31",
            "runtime": 136,
            "genres": [{"id": 28, "name": "Action"}],
            "poster_path": "/p.jpg",
            "backdrop_path": "/b.jpg",
            "vote_average": 8.2,
            "vote_count": 24000,
            "credits": {"cast": [{"id": 6384, "name": "Keanu Reeves", "character": "Neo"}]}
        }"#;

        let detail: TmdbDetail = serde_json::from_str(payload).unwrap();
        assert_eq!(detail.id, Some(603));
        assert_eq!(detail.display_title(), "Matrix");
        assert_eq!(detail.runtime, Some(136));
        assert!(detail.number_of_seasons.is_none());
    }

    #[test]
    fn serie_detail_uses_name() {
        let payload = r#"{
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "number_of_seasons": 5,
            "number_of_episodes": 62,
            "episode_run_time": [45]
        }"#;

        let detail: TmdbDetail = serde_json::from_str(payload).unwrap();
        assert_eq!(detail.display_title(), "Breaking Bad");
        assert_eq!(detail.number_of_seasons, Some(5));
        assert!(detail.runtime.is_none());
    }

    #[test]
    fn search_page_tolerates_null_results() {
        let page: SearchPage<TmdbSummary> =
            serde_json::from_str(r#"{"page": 1, "results": null}"#).unwrap();
        assert!(page.results.is_none());
        assert_eq!(page.result_count(), 0);
    }

    #[test]
    fn multi_page_drops_people() {
        let page: SearchPage<TmdbMultiResult> = serde_json::from_str(
            r#"{
                "page": 1,
                "results": [
                    {"id": 603, "media_type": "movie", "title": "The Matrix"},
                    {"id": 6384, "media_type": "person", "name": "Keanu Reeves"},
                    {"id": 1396, "media_type": "tv", "name": "Breaking Bad"}
                ],
                "total_pages": 1,
                "total_results": 3
            }"#,
        )
        .unwrap();

        let page = page.retain_titles();
        let results = page.results.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(TmdbMultiResult::is_title));
        assert_eq!(results[0].id, Some(603));
        assert_eq!(results[1].display_title(), Some("Breaking Bad"));
    }
}
