//! Sorting, grouping and filtering over result sets.
//!
//! All functions are pure and operate on records already returned by the
//! orchestrator.

mod filter;
mod group;
mod sort;

pub use filter::{filter_by_quality, QualityFilter};
pub use group::{
    available_seasons, group_by_quality, group_by_season, group_by_season_and_quality,
    quality_stats, QualityBucket, QualityGroups, SeasonBucket, SeasonGroups,
};
pub use sort::{sort, SortField, SortOrder};
