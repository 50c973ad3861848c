use serde::{Deserialize, Serialize};

use crate::searcher::{Quality, TorrentRecord};

use super::group::QualityBucket;

/// Quality constraints applied to a result set.
///
/// `qualities` and `exclude_qualities` are labels compared case-insensitively
/// with the record's bucket label ("4K", "1080p", ...). `min_quality` and
/// `max_quality` compare tiers. A record with no detected tier fails any
/// active `qualities`, min or max constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFilter {
    #[serde(default)]
    pub qualities: Vec<String>,
    #[serde(default)]
    pub min_quality: Option<Quality>,
    #[serde(default)]
    pub max_quality: Option<Quality>,
    #[serde(default)]
    pub exclude_qualities: Vec<String>,
    #[serde(default)]
    pub hdr: Option<bool>,
    #[serde(default)]
    pub hevc: Option<bool>,
}

impl QualityFilter {
    /// Whether no constraint is set.
    pub fn is_empty(&self) -> bool {
        self == &QualityFilter::default()
    }

    /// Whether a single record satisfies every active constraint.
    pub fn matches(&self, record: &TorrentRecord) -> bool {
        let tier = record.detected_quality;
        let label = QualityBucket::from(tier).label();

        if !self.qualities.is_empty() {
            let listed = self.qualities.iter().any(|q| q.eq_ignore_ascii_case(label));
            if tier.is_none() || !listed {
                return false;
            }
        }

        if let Some(min) = self.min_quality {
            if !tier.is_some_and(|t| t >= min) {
                return false;
            }
        }

        if let Some(max) = self.max_quality {
            if !tier.is_some_and(|t| t <= max) {
                return false;
            }
        }

        if tier.is_some()
            && self
                .exclude_qualities
                .iter()
                .any(|q| q.eq_ignore_ascii_case(label))
        {
            return false;
        }

        if self.hdr.is_some_and(|wanted| wanted != record.hdr) {
            return false;
        }

        if self.hevc.is_some_and(|wanted| wanted != record.hevc) {
            return false;
        }

        true
    }
}

/// Keep records satisfying the filter, preserving order.
pub fn filter_by_quality(
    records: Vec<TorrentRecord>,
    filter: &QualityFilter,
) -> Vec<TorrentRecord> {
    if filter.is_empty() {
        return records;
    }
    records.into_iter().filter(|r| filter.matches(r)).collect()
}
