//! Deduplication of torrent search results by magnet URI.

use std::collections::HashSet;

use super::TorrentRecord;

/// Drop records whose magnet URI was already seen, keeping the first instance.
///
/// Order of the surviving records is preserved.
pub fn dedup_by_magnet(records: Vec<TorrentRecord>) -> Vec<TorrentRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.magnet_uri.clone()))
        .collect()
}

/// Union two result sets by magnet URI; `first` wins on conflicts.
pub fn merge_by_magnet(
    first: Vec<TorrentRecord>,
    second: Vec<TorrentRecord>,
) -> Vec<TorrentRecord> {
    dedup_by_magnet(first.into_iter().chain(second).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::record;

    fn magnets(records: &[TorrentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.magnet_uri.as_str()).collect()
    }

    #[test]
    fn test_dedup_keeps_first_seen() {
        let mut dup = record("Second copy", "m1");
        dup.seeders = 999;
        let records = vec![record("First copy", "m1"), record("Other", "m2"), dup];

        let result = dedup_by_magnet(records);

        assert_eq!(magnets(&result), vec!["m1", "m2"]);
        assert_eq!(result[0].title, "First copy");
    }

    #[test]
    fn test_merge_overlapping_sets() {
        let a = vec![record("A", "m1"), record("B", "m2")];
        let b = vec![record("B again", "m2"), record("C", "m3")];

        let merged = merge_by_magnet(a, b);

        assert_eq!(magnets(&merged), vec!["m1", "m2", "m3"]);
        assert_eq!(merged[1].title, "B");
    }

    #[test]
    fn test_merge_with_self_is_idempotent() {
        let a = vec![record("A", "m1"), record("B", "m2"), record("C", "m3")];

        let merged = merge_by_magnet(a.clone(), a.clone());

        assert_eq!(merged, a);
    }

    #[test]
    fn test_merge_empty_sides() {
        let a = vec![record("A", "m1")];
        assert_eq!(merge_by_magnet(a.clone(), vec![]), a);
        assert_eq!(merge_by_magnet(vec![], a.clone()), a);
        assert!(merge_by_magnet(vec![], vec![]).is_empty());
    }
}
