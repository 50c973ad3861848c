//! Season number extraction from release titles.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Season patterns, matched against the lowercased title.
///
/// Prefix form: `s01`, `season 2`, `сезон: 3`. Suffix form: `2 сезон`,
/// `2season`. A prefix match right after an ASCII letter is discarded, so
/// "DTS5.1" is not season 5.
pub const SEASON_PATTERN: &str =
    r"(?:s|season|сезон)[\s:]*(\d+)|(\d+)\s*(?:season|сезон)";

static SEASON_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(SEASON_PATTERN).unwrap());

/// Season numbers mentioned in a title, unioned with the structured set.
///
/// Every distinct match is kept, so a season pack lands in several seasons.
/// Season 0 is ignored. An empty result means the season is unknown.
pub fn extract(title: &str, structured: &BTreeSet<u32>) -> BTreeSet<u32> {
    let mut seasons = structured.clone();
    seasons.extend(title_seasons(title));
    seasons
}

/// Whether a title (or structured set) mentions the given season.
pub fn mentions_season(title: &str, structured: &BTreeSet<u32>, season: u32) -> bool {
    structured.contains(&season) || title_seasons(title).contains(&season)
}

fn title_seasons(title: &str) -> BTreeSet<u32> {
    let lowered = title.to_lowercase();
    SEASON_REGEX
        .captures_iter(&lowered)
        .filter_map(|caps| match caps.get(1) {
            Some(number) => {
                let start = caps.get(0).map_or(0, |m| m.start());
                let after_letter = lowered[..start]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_ascii_alphabetic());
                (!after_letter).then_some(number)
            }
            None => caps.get(2),
        })
        .filter_map(|m| m.as_str().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .collect()
}
