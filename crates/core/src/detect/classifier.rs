//! Content-type classification of search results.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::searcher::{ContentType, TorrentRecord};

/// Structured type tags accepted for each content type.
pub const MOVIE_TAGS: &[&str] = &["movie", "multfilm", "documovie"];
pub const SERIAL_TAGS: &[&str] = &["serial", "multserial", "docuserial", "tvshow"];
pub const ANIME_TAGS: &[&str] = &["anime"];

/// Indexer category descriptions that denote anime.
pub const ANIME_CATEGORIES: &[&str] = &["TV/Anime", "5070"];

/// Episodic vocabulary in English and Russian, matched on the lowercased title.
pub const EPISODIC_PATTERN: &str = r"сезон|серии|series|season|эпизод|episode";

static EPISODIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(EPISODIC_PATTERN).unwrap());

fn tags_for(target: ContentType) -> &'static [&'static str] {
    match target {
        ContentType::Movie => MOVIE_TAGS,
        ContentType::Serial => SERIAL_TAGS,
        ContentType::Anime => ANIME_TAGS,
    }
}

/// Whether a record belongs to the target content type.
///
/// Structured type tags decide when present; otherwise the title and
/// category are inspected.
pub fn accepts(record: &TorrentRecord, target: ContentType) -> bool {
    if !record.content_types.is_empty() {
        let wanted = tags_for(target);
        return record
            .content_types
            .iter()
            .any(|tag| wanted.contains(&tag.as_str()));
    }

    let title = record.title.to_lowercase();
    match target {
        ContentType::Movie => !EPISODIC_REGEX.is_match(&title),
        ContentType::Serial => EPISODIC_REGEX.is_match(&title),
        ContentType::Anime => {
            ANIME_CATEGORIES.contains(&record.category.as_str()) || title.contains("anime")
        }
    }
}

/// Keep only records accepted for the target content type, preserving order.
pub fn filter_by_content_type(
    records: Vec<TorrentRecord>,
    target: ContentType,
) -> Vec<TorrentRecord> {
    records
        .into_iter()
        .filter(|r| accepts(r, target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::record;

    fn tagged(title: &str, tags: &[&str]) -> TorrentRecord {
        let mut r = record(title, "m");
        r.content_types = tags.iter().map(|t| t.to_string()).collect();
        r
    }

    #[test]
    fn test_structured_tags_movie() {
        assert!(accepts(&tagged("X", &["multfilm"]), ContentType::Movie));
        assert!(accepts(&tagged("X", &["documovie"]), ContentType::Movie));
        assert!(!accepts(&tagged("X", &["serial"]), ContentType::Movie));
    }

    #[test]
    fn test_structured_tags_serial() {
        assert!(accepts(&tagged("X", &["tvshow"]), ContentType::Serial));
        assert!(accepts(&tagged("X", &["movie", "docuserial"]), ContentType::Serial));
        assert!(!accepts(&tagged("X", &["anime"]), ContentType::Serial));
    }

    #[test]
    fn test_structured_tags_override_title() {
        // Title says season, tags say movie: tags win.
        let r = tagged("Show Season 1", &["movie"]);
        assert!(accepts(&r, ContentType::Movie));
        assert!(!accepts(&r, ContentType::Serial));
    }

    #[test]
    fn test_title_fallback_serial_and_movie() {
        let serial = record("Тьма / Сезон 2 / Серии 1-8", "m1");
        let movie = record("Inception.2010.1080p.BluRay", "m2");

        assert!(accepts(&serial, ContentType::Serial));
        assert!(!accepts(&serial, ContentType::Movie));
        assert!(accepts(&movie, ContentType::Movie));
        assert!(!accepts(&movie, ContentType::Serial));
    }

    #[test]
    fn test_title_fallback_is_case_insensitive() {
        assert!(accepts(&record("SHOW SEASON 4", "m"), ContentType::Serial));
        assert!(accepts(&record("ТЬМА СЕЗОН 4", "m"), ContentType::Serial));
    }

    #[test]
    fn test_anime_fallback() {
        let mut by_category = record("Shingeki no Kyojin", "m1");
        by_category.category = "TV/Anime".to_string();
        let by_title = record("Some Anime Movie", "m2");
        let neither = record("Some Movie", "m3");

        assert!(accepts(&by_category, ContentType::Anime));
        assert!(accepts(&by_title, ContentType::Anime));
        assert!(!accepts(&neither, ContentType::Anime));
    }

    #[test]
    fn test_filter_preserves_order() {
        let records = vec![
            record("A Season 1", "m1"),
            record("B Movie", "m2"),
            record("C Season 2", "m3"),
        ];
        let filtered = filter_by_content_type(records, ContentType::Serial);
        let magnets: Vec<_> = filtered.iter().map(|r| r.magnet_uri.as_str()).collect();
        assert_eq!(magnets, vec!["m1", "m3"]);
    }
}
