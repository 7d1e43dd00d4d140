use futures::StreamExt;
use futures::stream;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::provider::MediaProvider;
use crate::models::media::{MediaKind, MediaRecord};

/// The single display attribute enrichment attaches to a listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct PosterRef {
    pub poster_path: Option<String>,
}

/// A record projected for a listing, with the poster reference merged in
/// when the provider lookup succeeded. The `tmdb` key is omitted from
/// the JSON entirely when no poster could be attached.
#[derive(Debug, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: MediaRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<PosterRef>,
}

/// Fans out provider detail lookups over a listing with bounded
/// concurrency. Per-record failures degrade to "no poster" so a single
/// bad provider response can never fail the whole listing.
#[derive(Clone)]
pub struct Enricher {
    provider: Arc<dyn MediaProvider>,
    concurrency: usize,
}

impl Enricher {
    #[must_use]
    pub fn new(provider: Arc<dyn MediaProvider>, concurrency: usize) -> Self {
        Self {
            provider,
            concurrency: concurrency.max(1),
        }
    }

    /// At most `concurrency` provider calls are in flight at once, and
    /// `buffered` yields completions in input order, so the output list
    /// always matches the input order and length.
    pub async fn attach_posters(
        &self,
        kind: MediaKind,
        records: Vec<MediaRecord>,
    ) -> Vec<EnrichedRecord> {
        stream::iter(records)
            .map(|record| {
                let provider = Arc::clone(&self.provider);
                async move {
                    let tmdb = match record.tmdb_id {
                        Some(tmdb_id) => match provider.details(kind, tmdb_id).await {
                            Ok(detail) => Some(PosterRef {
                                poster_path: detail.poster_path,
                            }),
                            Err(err) => {
                                debug!(
                                    "could not enrich poster for {} {}: {}",
                                    kind, record.id, err
                                );
                                None
                            }
                        },
                        None => None,
                    };
                    EnrichedRecord { record, tmdb }
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::tmdb::{SearchPage, TmdbDetail, TmdbError, TmdbMultiResult, TmdbSummary};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PosterProvider {
        failing: HashSet<i32>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MediaProvider for PosterProvider {
        async fn search(
            &self,
            _kind: MediaKind,
            _query: &str,
        ) -> Result<SearchPage<TmdbSummary>, TmdbError> {
            unimplemented!("not used by enrichment")
        }

        async fn search_multi(
            &self,
            _query: &str,
        ) -> Result<SearchPage<TmdbMultiResult>, TmdbError> {
            unimplemented!("not used by enrichment")
        }

        async fn details(&self, _kind: MediaKind, tmdb_id: i32) -> Result<TmdbDetail, TmdbError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.contains(&tmdb_id) {
                return Err(TmdbError::Unavailable("boom".to_string()));
            }
            Ok(TmdbDetail {
                id: Some(tmdb_id),
                poster_path: Some(format!("/poster-{tmdb_id}.jpg")),
                ..Default::default()
            })
        }
    }

    fn record(id: i64, tmdb_id: Option<i32>) -> MediaRecord {
        let now = Utc::now();
        MediaRecord {
            id,
            title: format!("title {id}"),
            tmdb_id,
            rating: None,
            wishlist: false,
            review: None,
            view_count: 0,
            watched: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn failures_degrade_to_no_poster_and_order_is_preserved() {
        let provider = Arc::new(PosterProvider {
            failing: HashSet::from([7]),
            calls: AtomicUsize::new(0),
        });
        let enricher = Enricher::new(provider.clone(), 3);

        let records = vec![
            record(1, Some(7)),
            record(2, Some(8)),
            record(3, None),
            record(4, Some(9)),
        ];
        let enriched = enricher.attach_posters(MediaKind::Movie, records).await;

        assert_eq!(enriched.len(), 4);
        assert_eq!(
            enriched.iter().map(|e| e.record.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert!(enriched[0].tmdb.is_none());
        assert_eq!(
            enriched[1].tmdb.as_ref().unwrap().poster_path.as_deref(),
            Some("/poster-8.jpg")
        );
        assert!(enriched[2].tmdb.is_none());
        assert!(enriched[3].tmdb.is_some());

        // record 3 has no external id, so only three fetches happen
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let provider = Arc::new(PosterProvider {
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        });
        let enricher = Enricher::new(provider.clone(), 10);

        let enriched = enricher.attach_posters(MediaKind::Serie, Vec::new()).await;
        assert!(enriched.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn enriched_record_omits_tmdb_key_when_absent() {
        let with = EnrichedRecord {
            record: record(1, Some(5)),
            tmdb: Some(PosterRef {
                poster_path: Some("/p.jpg".to_string()),
            }),
        };
        let without = EnrichedRecord {
            record: record(2, None),
            tmdb: None,
        };

        let with = serde_json::to_value(&with).unwrap();
        let without = serde_json::to_value(&without).unwrap();

        assert_eq!(with["tmdb"]["poster_path"], "/p.jpg");
        assert!(without.get("tmdb").is_none());
        assert_eq!(without["viewCount"], 0);
    }
}
