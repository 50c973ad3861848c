//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Indexer gateway (requests, latency)
//! - Search cascade (strategies, result counts, end-to-end searches)
//! - Title resolution (TMDB lookups)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Indexer Gateway Metrics
// =============================================================================

/// Indexer requests total by outcome.
pub static INDEXER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "torrentlens_indexer_requests_total",
            "Total requests sent to the indexer search endpoint",
        ),
        // "success", "timeout", "connection", "http_status", "malformed", "client"
        &["status"],
    )
    .unwrap()
});

/// Indexer request duration in seconds.
pub static INDEXER_REQUEST_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "torrentlens_indexer_request_duration_seconds",
            "Duration of indexer search requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 8.0, 10.0]),
    )
    .unwrap()
});

// =============================================================================
// Search Cascade Metrics
// =============================================================================

/// Cascade strategies executed, by strategy label.
pub static STRATEGIES_EXECUTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "torrentlens_strategies_executed_total",
            "Total search strategies executed by the cascade",
        ),
        &["strategy"], // "structured", "season_fallback", "free_text_fallback", "free_text"
    )
    .unwrap()
});

/// Records returned per strategy, after classification.
pub static STRATEGY_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "torrentlens_strategy_results",
            "Number of records returned per executed strategy",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
        &["strategy"],
    )
    .unwrap()
});

/// Searches total by entry point.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("torrentlens_searches_total", "Total searches handled"),
        &["kind"], // "external_id", "free_text", "title"
    )
    .unwrap()
});

/// Final result count per search (after merge and cap).
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "torrentlens_search_results",
            "Number of records returned per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 15.0, 20.0]),
    )
    .unwrap()
});

// =============================================================================
// Title Resolution Metrics
// =============================================================================

/// Title resolutions total by result.
pub static TITLE_RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "torrentlens_title_resolutions_total",
            "Total external id to title resolutions",
        ),
        &["result"], // "resolved", "not_found", "unsupported", "error", "not_configured"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Indexer
        Box::new(INDEXER_REQUESTS.clone()),
        Box::new(INDEXER_REQUEST_DURATION.clone()),
        // Cascade
        Box::new(STRATEGIES_EXECUTED.clone()),
        Box::new(STRATEGY_RESULTS.clone()),
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        // Title resolution
        Box::new(TITLE_RESOLUTIONS.clone()),
    ]
}
