//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits,
//! allowing the search cascade and the HTTP layer to be tested without a
//! live indexer or TMDB.
//!
//! # Example
//!
//! ```rust,ignore
//! use torrentlens_core::testing::{fixtures, MockSearcher, MockTitleResolver};
//!
//! let searcher = MockSearcher::new();
//! let resolver = MockTitleResolver::new();
//!
//! // Configure mock responses
//! searcher
//!     .respond_when(|q| q.season == Some(1), vec![fixtures::serial("Dark S01", "m1")])
//!     .await;
//! resolver.add_title("tt5753856", fixtures::resolved("Тьма", "Dark", 2017)).await;
//!
//! // Use in SearchOrchestrator / AppState...
//! ```

mod mock_searcher;
mod mock_title_resolver;

pub use mock_searcher::{MockSearcher, RecordedSearch};
pub use mock_title_resolver::MockTitleResolver;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::BTreeSet;

    use crate::detect::quality;
    use crate::searcher::TorrentRecord;
    use crate::title_resolver::ResolvedTitle;

    /// Create a test record with reasonable defaults.
    ///
    /// Nothing is derived from the title: no tier, flags, seasons or tags.
    pub fn record(title: &str, magnet: &str) -> TorrentRecord {
        TorrentRecord {
            title: title.to_string(),
            tracker: "mock-tracker".to_string(),
            source: "mock".to_string(),
            size_bytes: 1024 * 1024 * 700, // 700 MB
            seeders: 10,
            peers: 2,
            magnet_uri: magnet.to_string(),
            publish_date: None,
            category: "Movies".to_string(),
            detected_quality: None,
            hdr: false,
            hevc: false,
            content_types: BTreeSet::new(),
            seasons: BTreeSet::new(),
            voices: Vec::new(),
            details_url: None,
        }
    }

    /// A record with tier and HDR/HEVC flags detected from the title.
    pub fn record_with_quality(title: &str, magnet: &str) -> TorrentRecord {
        let info = quality::detect(title);
        TorrentRecord {
            detected_quality: info.tier,
            hdr: info.hdr,
            hevc: info.hevc,
            ..record(title, magnet)
        }
    }

    /// A record tagged by the indexer as a serial.
    pub fn serial(title: &str, magnet: &str) -> TorrentRecord {
        let mut r = record(title, magnet);
        r.category = "TV".to_string();
        r.content_types.insert("serial".to_string());
        r
    }

    /// A resolved title.
    pub fn resolved(russian: &str, original: &str, year: u32) -> ResolvedTitle {
        ResolvedTitle {
            original_title: original.to_string(),
            russian_title: russian.to_string(),
            year: Some(year),
        }
    }
}
