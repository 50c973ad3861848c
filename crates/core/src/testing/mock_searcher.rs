//! Mock searcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::searcher::{SearchQuery, Searcher, TorrentRecord};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// The query that was searched.
    pub query: SearchQuery,
    /// When the search was made.
    pub timestamp: Instant,
}

type QueryPredicate = Box<dyn Fn(&SearchQuery) -> bool + Send + Sync>;

/// Mock implementation of the Searcher trait.
///
/// Provides controllable behavior for testing:
/// - Scripted responses selected by a query predicate (first match wins)
/// - Default results for queries no predicate matches
/// - Track search queries for assertions
///
/// Like the real gateway, it never fails: an unscripted query yields an
/// empty list, which is also how an indexer outage looks to callers.
///
/// # Example
///
/// ```rust,ignore
/// use torrentlens_core::testing::{MockSearcher, fixtures};
///
/// let searcher = MockSearcher::new();
/// searcher
///     .respond_when(|q| q.season == Some(2), vec![fixtures::serial("Dark S02", "m1")])
///     .await;
///
/// let records = searcher.search(&SearchQuery::default().with_season(Some(2))).await;
/// assert_eq!(records.len(), 1);
///
/// let searches = searcher.recorded_searches().await;
/// assert_eq!(searches.len(), 1);
/// ```
pub struct MockSearcher {
    /// Results for queries no scripted response matches.
    results: Arc<RwLock<Vec<TorrentRecord>>>,
    /// Scripted responses, checked in insertion order.
    responses: Arc<RwLock<Vec<(QueryPredicate, Vec<TorrentRecord>)>>>,
    /// Recorded search queries.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
}

impl std::fmt::Debug for MockSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSearcher")
            .field("results", &"<results>")
            .field("responses", &"<responses>")
            .field("searches", &"<searches>")
            .finish()
    }
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearcher {
    /// Create a new mock searcher with empty results.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set the default results returned when no scripted response matches.
    pub async fn set_results(&self, results: Vec<TorrentRecord>) {
        *self.results.write().await = results;
    }

    /// Return `results` for queries matching `predicate`.
    pub async fn respond_when<F>(&self, predicate: F, results: Vec<TorrentRecord>)
    where
        F: Fn(&SearchQuery) -> bool + Send + Sync + 'static,
    {
        self.responses
            .write()
            .await
            .push((Box::new(predicate), results));
    }

    /// Get recorded search queries.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Clear recorded searches.
    pub async fn clear_recorded(&self) {
        self.searches.write().await.clear();
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }
}

#[async_trait]
impl Searcher for MockSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &SearchQuery) -> Vec<TorrentRecord> {
        self.searches.write().await.push(RecordedSearch {
            query: query.clone(),
            timestamp: Instant::now(),
        });

        let responses = self.responses.read().await;
        if let Some((_, results)) = responses.iter().find(|(matches, _)| matches(query)) {
            return results.clone();
        }

        self.results.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_default_results_and_recording() {
        let searcher = MockSearcher::new();
        searcher
            .set_results(vec![fixtures::record("Dark", "m1")])
            .await;

        let records = searcher.search(&SearchQuery::free_text("dark")).await;

        assert_eq!(records.len(), 1);
        let searches = searcher.recorded_searches().await;
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].query.query.as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_first_matching_response_wins() {
        let searcher = MockSearcher::new();
        searcher
            .respond_when(|q| q.year == Some(2017), vec![fixtures::record("A", "m1")])
            .await;
        searcher
            .respond_when(|_| true, vec![fixtures::record("B", "m2")])
            .await;

        let with_year = searcher
            .search(&SearchQuery::free_text("x").with_year(Some(2017)))
            .await;
        assert_eq!(with_year[0].magnet_uri, "m1");

        let without_year = searcher.search(&SearchQuery::free_text("x")).await;
        assert_eq!(without_year[0].magnet_uri, "m2");
    }

    #[tokio::test]
    async fn test_unscripted_query_is_empty() {
        let searcher = MockSearcher::new();
        assert!(searcher.search(&SearchQuery::free_text("x")).await.is_empty());

        searcher.clear_recorded().await;
        assert_eq!(searcher.search_count().await, 0);
    }
}
