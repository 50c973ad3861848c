//! Resolution tier and HDR/HEVC detection from release titles.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;

use crate::searcher::Quality;

/// Tier patterns, highest resolution first. The first match wins.
pub const QUALITY_PATTERNS: &[(&str, Quality)] = &[
    (r"(?i)2160p|4k", Quality::P2160),
    (r"(?i)1440p", Quality::P1440),
    (r"(?i)1080p", Quality::P1080),
    (r"(?i)720p", Quality::P720),
    (r"(?i)480p", Quality::P480),
    (r"(?i)360p", Quality::P360),
];

/// HDR markers, matched anywhere in the title ("DVDRip" counts).
pub const HDR_PATTERN: &str = r"(?i)hdr|dolby.vision|dv";

pub const HEVC_PATTERN: &str = r"(?i)hevc|h\.265|x265";

static QUALITY_REGEXES: Lazy<Vec<(Regex, Quality)>> = Lazy::new(|| {
    QUALITY_PATTERNS
        .iter()
        .map(|(pattern, quality)| (Regex::new(pattern).unwrap(), *quality))
        .collect()
});

static HDR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(HDR_PATTERN).unwrap());

static HEVC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(HEVC_PATTERN).unwrap());

/// Attributes inferred from a release title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct QualityInfo {
    pub tier: Option<Quality>,
    pub hdr: bool,
    pub hevc: bool,
}

/// Detect resolution tier and HDR/HEVC flags from a title.
pub fn detect(title: &str) -> QualityInfo {
    QualityInfo {
        tier: detect_tier(title),
        hdr: HDR_REGEX.is_match(title),
        hevc: HEVC_REGEX.is_match(title),
    }
}

/// Highest declared resolution tier in the title, if any.
pub fn detect_tier(title: &str) -> Option<Quality> {
    QUALITY_REGEXES
        .iter()
        .find(|(re, _)| re.is_match(title))
        .map(|(_, quality)| *quality)
}

/// Interpret an indexer-supplied quality value ("1080p", "4K", "720").
pub fn parse_indexer_quality(value: &str) -> Option<Quality> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return format!("{}p", value).parse().ok();
    }
    value.parse().ok().or_else(|| detect_tier(value))
}
