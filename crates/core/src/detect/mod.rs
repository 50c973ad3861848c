//! Heuristics that infer structured attributes from release titles.
//!
//! Each heuristic is a pure, table-driven function:
//! - [`quality`]: resolution tier and HDR/HEVC flags
//! - [`season`]: season numbers
//! - [`classifier`]: movie / serial / anime acceptance

pub mod classifier;
pub mod quality;
pub mod season;

pub use classifier::{accepts, filter_by_content_type};
pub use quality::{detect, detect_tier, QualityInfo};
