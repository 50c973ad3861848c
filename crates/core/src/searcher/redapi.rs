//! RedAPI (Jackett-compatible multi-indexer) search gateway.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::IndexerConfig;
use crate::metrics::{INDEXER_REQUESTS, INDEXER_REQUEST_DURATION};

use super::normalize::parse_response;
use super::{SearchError, SearchQuery, Searcher, TorrentRecord};

/// Path of the aggregated all-indexers search endpoint.
const SEARCH_PATH: &str = "/api/v2.0/indexers/all/results";

/// Search gateway against a RedAPI / Jackett-style endpoint.
///
/// One HTTP GET per search with a bounded timeout. Every failure is logged
/// and surfaces as an empty result set.
pub struct RedApiSearcher {
    client: Client,
    config: IndexerConfig,
}

impl RedApiSearcher {
    /// Create a searcher using the configured timeout.
    pub fn new(config: IndexerConfig) -> Result<Self, SearchError> {
        let timeout = Duration::from_secs(config.timeout_secs as u64);
        Self::with_timeout(config, timeout)
    }

    /// Create a searcher with an explicit request timeout.
    pub fn with_timeout(config: IndexerConfig, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Build the search URL for a query.
    fn build_search_url(&self, query: &SearchQuery) -> String {
        let mut pairs = query.to_query_pairs();
        if !self.config.api_key.is_empty() {
            pairs.push(("apikey", self.config.api_key.clone()));
        }

        let query_string = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}{}?{}",
            self.config.url.trim_end_matches('/'),
            SEARCH_PATH,
            query_string
        )
    }

    /// Execute the request, surfacing failures as [`SearchError`].
    async fn fetch(&self, query: &SearchQuery) -> Result<Vec<TorrentRecord>, SearchError> {
        let url = self.build_search_url(query);
        debug!(query = ?query, "Searching indexer");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else if e.is_connect() {
                SearchError::ConnectionFailed(e.to_string())
            } else {
                SearchError::ConnectionFailed(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else {
                SearchError::Malformed(format!("failed to read body: {}", e))
            }
        })?;

        parse_response(&body).map_err(|e| SearchError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl Searcher for RedApiSearcher {
    fn name(&self) -> &str {
        "redapi"
    }

    async fn search(&self, query: &SearchQuery) -> Vec<TorrentRecord> {
        let start = Instant::now();
        let result = self.fetch(query).await;
        INDEXER_REQUEST_DURATION.observe(start.elapsed().as_secs_f64());

        match result {
            Ok(records) => {
                INDEXER_REQUESTS.with_label_values(&["success"]).inc();
                debug!(
                    results = records.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Indexer search complete"
                );
                records
            }
            Err(e) => {
                INDEXER_REQUESTS.with_label_values(&[e.kind()]).inc();
                warn!(error = %e, kind = e.kind(), "Indexer search failed, returning no results");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::ContentType;
    use axum::{extract::RawQuery, http::StatusCode, routing::get, Router};

    fn config(url: &str) -> IndexerConfig {
        IndexerConfig {
            url: url.to_string(),
            api_key: String::new(),
            timeout_secs: 8,
        }
    }

    async fn spawn_indexer(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_build_search_url() {
        let mut cfg = config("http://localhost:9117/"); // trailing slash
        cfg.api_key = "test-key".to_string();
        let searcher = RedApiSearcher::new(cfg).unwrap();

        let query = SearchQuery::structured(Some("Тьма".to_string()), Some("Dark".to_string()), Some(2017))
            .with_content_type(ContentType::Serial)
            .with_season(Some(2));
        let url = searcher.build_search_url(&query);

        assert!(url.starts_with("http://localhost:9117/api/v2.0/indexers/all/results?"));
        assert!(url.contains("title_original=Dark"));
        assert!(url.contains("year=2017"));
        assert!(url.contains("is_serial=2"));
        assert!(url.contains("category%5B%5D=5000"));
        assert!(url.contains("season=2"));
        assert!(url.contains("apikey=test-key"));
        assert!(url.contains(&format!("title={}", urlencoding::encode("Тьма"))));
    }

    #[test]
    fn test_build_search_url_free_text_without_key() {
        let searcher = RedApiSearcher::new(config("http://localhost:9117")).unwrap();
        let url = searcher.build_search_url(&SearchQuery::free_text("dark 2017"));

        assert!(url.ends_with("?query=dark%202017"));
        assert!(!url.contains("apikey"));
    }

    #[tokio::test]
    async fn test_search_parses_results() {
        let router = Router::new().route(
            SEARCH_PATH,
            get(|RawQuery(query): RawQuery| async move {
                let title = query.unwrap_or_default();
                serde_json::json!({
                    "Results": [
                        { "Title": title, "MagnetUri": "magnet:?xt=urn:btih:1", "Seeders": 3 }
                    ]
                })
                .to_string()
            }),
        );
        let url = spawn_indexer(router).await;
        let searcher = RedApiSearcher::new(config(&url)).unwrap();

        let records = searcher.search(&SearchQuery::free_text("dark")).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "query=dark");
        assert_eq!(records[0].seeders, 3);
    }

    #[tokio::test]
    async fn test_timeout_returns_empty() {
        let router = Router::new().route(
            SEARCH_PATH,
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "{}"
            }),
        );
        let url = spawn_indexer(router).await;
        let searcher =
            RedApiSearcher::with_timeout(config(&url), Duration::from_millis(200)).unwrap();

        let start = Instant::now();
        let records = searcher.search(&SearchQuery::free_text("slow")).await;

        assert!(records.is_empty());
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_connection_refused_returns_empty() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let searcher = RedApiSearcher::new(config(&format!("http://{}", addr))).unwrap();
        let records = searcher.search(&SearchQuery::free_text("offline")).await;

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_returns_empty() {
        let router = Router::new().route(
            SEARCH_PATH,
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let url = spawn_indexer(router).await;
        let searcher = RedApiSearcher::new(config(&url)).unwrap();

        assert!(searcher.search(&SearchQuery::free_text("x")).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_payload_returns_empty() {
        let router = Router::new()
            .route(SEARCH_PATH, get(|| async { "<html>not json</html>" }));
        let url = spawn_indexer(router).await;
        let searcher = RedApiSearcher::new(config(&url)).unwrap();

        assert!(searcher.search(&SearchQuery::free_text("x")).await.is_empty());
    }
}
