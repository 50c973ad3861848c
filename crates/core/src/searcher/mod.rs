//! Torrent search abstraction.
//!
//! This module provides a `Searcher` trait for querying a multi-indexer
//! search API, the RedAPI gateway implementation, response normalization and
//! magnet-URI deduplication.

mod dedup;
pub mod normalize;
mod redapi;
mod types;

pub use dedup::{dedup_by_magnet, merge_by_magnet};
pub use normalize::{normalize, parse_response};
pub use redapi::RedApiSearcher;
pub use types::*;
