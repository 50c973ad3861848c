//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock indexer and a mock title resolver injected, so the HTTP layer
//! can be tested without RedAPI or TMDB.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use torrentlens_core::config::SearchConfig;
use torrentlens_core::testing::{MockSearcher, MockTitleResolver};
use torrentlens_core::{Config, SearchOrchestrator, Searcher, TitleResolver};
use torrentlens_server::api::create_router;
use torrentlens_server::state::AppState;

/// Re-export fixtures for test convenience
pub use torrentlens_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new();
///     fixture.searcher.set_results(vec![fixtures::record("Movie", "m1")]).await;
///
///     let response = fixture.get("/api/v1/torrents/search?query=movie").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock searcher - configure indexer results
    pub searcher: Arc<MockSearcher>,
    /// Mock title resolver - configure id lookups
    pub resolver: Arc<MockTitleResolver>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default config and a title resolver.
    pub fn new() -> Self {
        Self::with_config(Config::default(), true)
    }

    /// Create a test fixture without a title resolver.
    pub fn without_resolver() -> Self {
        Self::with_config(Config::default(), false)
    }

    /// Create a test fixture with custom search tunables.
    pub fn with_search_config(search: SearchConfig) -> Self {
        Self::with_config(
            Config {
                search,
                ..Config::default()
            },
            true,
        )
    }

    fn with_config(config: Config, with_resolver: bool) -> Self {
        let searcher = Arc::new(MockSearcher::new());
        let resolver = Arc::new(MockTitleResolver::new());

        let mut orchestrator = SearchOrchestrator::new(
            Arc::clone(&searcher) as Arc<dyn Searcher>,
            config.search.clone(),
        );
        if with_resolver {
            orchestrator =
                orchestrator.with_resolver(Arc::clone(&resolver) as Arc<dyn TitleResolver>);
        }

        let state = Arc::new(AppState::new(config, Arc::new(orchestrator)));
        let router = create_router(state);

        Self {
            router,
            searcher,
            resolver,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Magnet URIs of a flat result list, in order.
pub fn magnets(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r["magnet_uri"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
