use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use serde::{Serialize, Serializer};

use crate::detect::season;
use crate::searcher::{Quality, TorrentRecord};

use super::sort::{compare, SortField, SortOrder};

/// Quality bucket, declared in display order (highest tier first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityBucket {
    /// 2160p and "4K" releases.
    FourK,
    P1440,
    P1080,
    P720,
    P480,
    P360,
    Unknown,
}

impl QualityBucket {
    pub fn label(&self) -> &'static str {
        match self {
            QualityBucket::FourK => "4K",
            QualityBucket::P1440 => "1440p",
            QualityBucket::P1080 => "1080p",
            QualityBucket::P720 => "720p",
            QualityBucket::P480 => "480p",
            QualityBucket::P360 => "360p",
            QualityBucket::Unknown => "unknown",
        }
    }
}

impl From<Option<Quality>> for QualityBucket {
    fn from(quality: Option<Quality>) -> Self {
        match quality {
            Some(Quality::P2160) => QualityBucket::FourK,
            Some(Quality::P1440) => QualityBucket::P1440,
            Some(Quality::P1080) => QualityBucket::P1080,
            Some(Quality::P720) => QualityBucket::P720,
            Some(Quality::P480) => QualityBucket::P480,
            Some(Quality::P360) => QualityBucket::P360,
            None => QualityBucket::Unknown,
        }
    }
}

impl fmt::Display for QualityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for QualityBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Season bucket; numbered seasons ascending, then unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeasonBucket {
    Season(u32),
    Unknown,
}

impl fmt::Display for SeasonBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonBucket::Season(n) => write!(f, "Season {}", n),
            SeasonBucket::Unknown => f.write_str("Unknown"),
        }
    }
}

impl Serialize for SeasonBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub type QualityGroups = BTreeMap<QualityBucket, Vec<TorrentRecord>>;
pub type SeasonGroups = BTreeMap<SeasonBucket, Vec<TorrentRecord>>;

fn sort_by_seeders(records: &mut [TorrentRecord]) {
    records.sort_by(|a, b| compare(a, b, SortField::Seeders, SortOrder::Desc));
}

/// Seasons of a record: structured seasons plus those named in the title.
fn record_seasons(record: &TorrentRecord) -> BTreeSet<u32> {
    season::extract(&record.title, &record.seasons)
}

/// Partition records by quality tier.
///
/// Every record lands in exactly one bucket; empty buckets are absent and
/// each bucket is ordered by seeders, highest first.
pub fn group_by_quality(records: &[TorrentRecord]) -> QualityGroups {
    let mut groups = QualityGroups::new();
    for record in records {
        groups
            .entry(QualityBucket::from(record.detected_quality))
            .or_default()
            .push(record.clone());
    }
    groups.values_mut().for_each(|g| sort_by_seeders(g));
    groups
}

/// Group records by season.
///
/// Not a partition: a season pack appears under every season it names, at
/// most once per bucket by magnet URI. Records without season information
/// go to [`SeasonBucket::Unknown`].
pub fn group_by_season(records: &[TorrentRecord]) -> SeasonGroups {
    let mut groups = SeasonGroups::new();
    let mut placed: HashSet<(SeasonBucket, &str)> = HashSet::new();

    for record in records {
        let seasons = record_seasons(record);
        let buckets: Vec<SeasonBucket> = if seasons.is_empty() {
            vec![SeasonBucket::Unknown]
        } else {
            seasons.into_iter().map(SeasonBucket::Season).collect()
        };

        for bucket in buckets {
            if placed.insert((bucket, record.magnet_uri.as_str())) {
                groups.entry(bucket).or_default().push(record.clone());
            }
        }
    }
    groups.values_mut().for_each(|g| sort_by_seeders(g));
    groups
}

/// Season buckets, each split by quality.
pub fn group_by_season_and_quality(
    records: &[TorrentRecord],
) -> BTreeMap<SeasonBucket, QualityGroups> {
    group_by_season(records)
        .into_iter()
        .map(|(season, members)| (season, group_by_quality(&members)))
        .collect()
}

/// Distinct season numbers across records, ascending.
pub fn available_seasons(records: &[TorrentRecord]) -> Vec<u32> {
    records
        .iter()
        .flat_map(record_seasons)
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}

/// Record count per quality bucket, unknown included.
pub fn quality_stats(records: &[TorrentRecord]) -> BTreeMap<QualityBucket, usize> {
    let mut stats = BTreeMap::new();
    for record in records {
        *stats
            .entry(QualityBucket::from(record.detected_quality))
            .or_insert(0) += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{record, record_with_quality};

    fn magnets(records: &[TorrentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.magnet_uri.as_str()).collect()
    }

    fn show_releases() -> Vec<TorrentRecord> {
        vec![
            record_with_quality("Show.S01.1080p.HEVC", "m1"),
            record_with_quality("Show.S02.720p", "m2"),
            record_with_quality("Show.2Season.480p", "m3"),
        ]
    }

    #[test]
    fn test_group_by_season_scenario() {
        let groups = group_by_season(&show_releases());

        assert_eq!(groups.len(), 2);
        assert_eq!(magnets(&groups[&SeasonBucket::Season(1)]), vec!["m1"]);
        assert_eq!(magnets(&groups[&SeasonBucket::Season(2)]), vec!["m2", "m3"]);
    }

    #[test]
    fn test_group_by_quality_scenario() {
        let groups = group_by_quality(&show_releases());

        assert_eq!(groups.len(), 3);
        assert_eq!(magnets(&groups[&QualityBucket::P1080]), vec!["m1"]);
        assert_eq!(magnets(&groups[&QualityBucket::P720]), vec!["m2"]);
        assert_eq!(magnets(&groups[&QualityBucket::P480]), vec!["m3"]);
    }

    #[test]
    fn test_group_by_quality_is_partition() {
        let records = vec![
            record_with_quality("A 2160p", "m1"),
            record_with_quality("B 4K HDR", "m2"),
            record_with_quality("C 1080p", "m3"),
            record_with_quality("D DVDRip", "m4"),
            record_with_quality("E 1080p", "m5"),
        ];
        let groups = group_by_quality(&records);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, records.len());
        // 2160p and 4K share one bucket
        assert_eq!(groups[&QualityBucket::FourK].len(), 2);
        assert_eq!(groups[&QualityBucket::Unknown].len(), 1);
        assert!(!groups.contains_key(&QualityBucket::P720));
    }

    #[test]
    fn test_quality_bucket_order() {
        let records = vec![
            record_with_quality("unknown tier", "m1"),
            record_with_quality("x 360p", "m2"),
            record_with_quality("x 2160p", "m3"),
            record_with_quality("x 1080p", "m4"),
        ];
        let labels: Vec<&str> = group_by_quality(&records)
            .keys()
            .map(QualityBucket::label)
            .collect();
        assert_eq!(labels, vec!["4K", "1080p", "360p", "unknown"]);
    }

    #[test]
    fn test_buckets_sorted_by_seeders() {
        let mut low = record_with_quality("Show S01 1080p", "low");
        low.seeders = 1;
        let mut high = record_with_quality("Show S01 1080p proper", "high");
        high.seeders = 100;

        let by_quality = group_by_quality(&[low.clone(), high.clone()]);
        assert_eq!(magnets(&by_quality[&QualityBucket::P1080]), vec!["high", "low"]);

        let by_season = group_by_season(&[low, high]);
        assert_eq!(magnets(&by_season[&SeasonBucket::Season(1)]), vec!["high", "low"]);
    }

    #[test]
    fn test_season_pack_in_every_bucket() {
        let records = vec![record("Show S01-S02 Complete", "pack")];
        let groups = group_by_season(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(magnets(&groups[&SeasonBucket::Season(1)]), vec!["pack"]);
        assert_eq!(magnets(&groups[&SeasonBucket::Season(2)]), vec!["pack"]);
    }

    #[test]
    fn test_unknown_season_bucket() {
        let mut structured = record("Show Complete", "m2");
        structured.seasons.insert(4);
        let records = vec![record("Show Movie Edition", "m1"), structured];

        let groups = group_by_season(&records);
        assert_eq!(magnets(&groups[&SeasonBucket::Unknown]), vec!["m1"]);
        assert_eq!(magnets(&groups[&SeasonBucket::Season(4)]), vec!["m2"]);
    }

    #[test]
    fn test_season_bucket_once_per_magnet() {
        let records = vec![record("Show S01", "m1"), record("Show S01 repack", "m1")];
        let groups = group_by_season(&records);
        assert_eq!(groups[&SeasonBucket::Season(1)].len(), 1);
    }

    #[test]
    fn test_bucket_serialization() {
        let groups = group_by_season(&show_releases());
        let json = serde_json::to_value(&groups).unwrap();
        assert!(json.get("Season 1").is_some());
        assert!(json.get("Season 2").is_some());

        let json = serde_json::to_value(group_by_quality(&[record("x 4k", "m")])).unwrap();
        assert!(json.get("unknown").is_some()); // fixture carries no detected tier
    }

    #[test]
    fn test_group_by_season_and_quality() {
        let nested = group_by_season_and_quality(&show_releases());
        let season2 = &nested[&SeasonBucket::Season(2)];
        assert_eq!(magnets(&season2[&QualityBucket::P720]), vec!["m2"]);
        assert_eq!(magnets(&season2[&QualityBucket::P480]), vec!["m3"]);
    }

    #[test]
    fn test_available_seasons_sorted_distinct() {
        let mut structured = record("Show", "m4");
        structured.seasons.insert(7);
        let records = vec![
            record("Show S03", "m1"),
            record("Show S01-S02", "m2"),
            record("Show 3 сезон", "m3"),
            structured,
        ];
        assert_eq!(available_seasons(&records), vec![1, 2, 3, 7]);
        assert!(available_seasons(&[]).is_empty());
    }

    #[test]
    fn test_quality_stats() {
        let stats = quality_stats(&[
            record_with_quality("a 1080p", "m1"),
            record_with_quality("b 1080p", "m2"),
            record_with_quality("c", "m3"),
        ]);
        assert_eq!(stats[&QualityBucket::P1080], 2);
        assert_eq!(stats[&QualityBucket::Unknown], 1);
        assert_eq!(stats.len(), 2);
    }
}
