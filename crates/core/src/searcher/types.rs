//! Types for the torrent search system.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content type a search targets.
///
/// Each variant carries the indexer's `is_serial` code and Torznab category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Serial,
    Anime,
}

impl ContentType {
    /// Value of the indexer's `is_serial` parameter.
    pub fn is_serial_code(&self) -> u8 {
        match self {
            ContentType::Movie => 1,
            ContentType::Serial => 2,
            ContentType::Anime => 5,
        }
    }

    /// Value of the indexer's `category[]` parameter.
    pub fn category_code(&self) -> u32 {
        match self {
            ContentType::Movie => 2000,
            ContentType::Serial => 5000,
            ContentType::Anime => 5070,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Serial => "serial",
            ContentType::Anime => "anime",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(ContentType::Movie),
            "serial" | "series" | "tv" => Ok(ContentType::Serial),
            "anime" => Ok(ContentType::Anime),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// Video resolution tier, ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "1440p")]
    P1440,
    #[serde(rename = "2160p")]
    P2160,
}

impl Quality {
    /// All tiers, lowest first.
    pub const ALL: [Quality; 6] = [
        Quality::P360,
        Quality::P480,
        Quality::P720,
        Quality::P1080,
        Quality::P1440,
        Quality::P2160,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Quality::P360 => "360p",
            Quality::P480 => "480p",
            Quality::P720 => "720p",
            Quality::P1080 => "1080p",
            Quality::P1440 => "1440p",
            Quality::P2160 => "2160p",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quality {
    type Err = String;

    /// Accepts tier labels case-insensitively, with "4K" as an alias of 2160p.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized == "4k" {
            return Ok(Quality::P2160);
        }
        Quality::ALL
            .into_iter()
            .find(|q| q.label() == normalized)
            .ok_or_else(|| format!("unknown quality: {}", s.trim()))
    }
}

/// Query parameters for a single indexer request.
///
/// Either a free-text `query` or the structured title fields are set; the
/// content-type and category codes are derived from `content_type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    /// IMDb identifier forwarded to the indexer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
}

impl SearchQuery {
    /// Free-text query.
    pub fn free_text(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Structured query by localized and original title.
    pub fn structured(
        title: Option<String>,
        original_title: Option<String>,
        year: Option<u32>,
    ) -> Self {
        Self {
            title: title.filter(|t| !t.trim().is_empty()),
            original_title: original_title.filter(|t| !t.trim().is_empty()),
            year,
            ..Default::default()
        }
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn with_year(mut self, year: Option<u32>) -> Self {
        self.year = year;
        self
    }

    pub fn with_imdb(mut self, imdb: Option<String>) -> Self {
        self.imdb = imdb;
        self
    }

    pub fn with_season(mut self, season: Option<u32>) -> Self {
        self.season = season;
        self
    }

    /// Serialize into the indexer's query-string pairs, skipping unset fields.
    ///
    /// The API key is not part of the query; the gateway appends it.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                pairs.push((key, v));
            }
        };

        push("query", self.query.clone());
        push("title", self.title.clone());
        push("title_original", self.original_title.clone());
        push("year", self.year.map(|y| y.to_string()));
        push(
            "is_serial",
            self.content_type.map(|c| c.is_serial_code().to_string()),
        );
        push(
            "category[]",
            self.content_type.map(|c| c.category_code().to_string()),
        );
        push("imdb", self.imdb.clone());
        push("season", self.season.map(|s| s.to_string()));
        pairs
    }
}

/// A normalized torrent search result.
///
/// `magnet_uri` is the identity key: two records with the same magnet URI are
/// the same release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentRecord {
    /// Release name as reported by the indexer.
    pub title: String,
    pub tracker: String,
    pub source: String,
    pub size_bytes: u64,
    pub seeders: u32,
    pub peers: u32,
    pub magnet_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<DateTime<Utc>>,
    pub category: String,
    /// Resolution tier inferred from the title (or indexer metadata).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_quality: Option<Quality>,
    pub hdr: bool,
    pub hevc: bool,
    /// Structured type tags ("movie", "serial", "anime", ...), possibly empty.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub content_types: BTreeSet<String>,
    /// Season numbers, structured plus extracted from the title.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub seasons: BTreeSet<u32>,
    /// Voice-over / dub tracks, when the indexer supplies them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
}

/// Errors that can occur inside the search gateway.
///
/// These never reach callers of [`Searcher::search`]; they are logged and
/// counted, and the search yields an empty result set.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Search backend returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed search response: {0}")]
    Malformed(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl SearchError {
    /// Metric label for this failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::ConnectionFailed(_) => "connection",
            SearchError::Timeout => "timeout",
            SearchError::HttpStatus { .. } => "http_status",
            SearchError::Malformed(_) => "malformed",
            SearchError::Client(_) => "client",
        }
    }
}

/// Trait for torrent search backends.
///
/// Implementations are fail-soft: any transport or payload failure yields an
/// empty list rather than an error.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Execute one search request.
    async fn search(&self, query: &SearchQuery) -> Vec<TorrentRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_codes() {
        assert_eq!(ContentType::Movie.is_serial_code(), 1);
        assert_eq!(ContentType::Serial.is_serial_code(), 2);
        assert_eq!(ContentType::Anime.is_serial_code(), 5);
        assert_eq!(ContentType::Movie.category_code(), 2000);
        assert_eq!(ContentType::Serial.category_code(), 5000);
        assert_eq!(ContentType::Anime.category_code(), 5070);
    }

    #[test]
    fn test_content_type_from_str_aliases() {
        assert_eq!("tv".parse::<ContentType>().unwrap(), ContentType::Serial);
        assert_eq!("Series".parse::<ContentType>().unwrap(), ContentType::Serial);
        assert_eq!("anime".parse::<ContentType>().unwrap(), ContentType::Anime);
        assert!("cartoon".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_quality_ordering() {
        assert!(Quality::P360 < Quality::P480);
        assert!(Quality::P1080 < Quality::P1440);
        assert!(Quality::P1440 < Quality::P2160);
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!("1080P".parse::<Quality>().unwrap(), Quality::P1080);
        assert_eq!("4K".parse::<Quality>().unwrap(), Quality::P2160);
        assert_eq!("2160p".parse::<Quality>().unwrap(), Quality::P2160);
        assert!("8k".parse::<Quality>().is_err());
    }

    #[test]
    fn test_quality_serialization() {
        assert_eq!(serde_json::to_string(&Quality::P720).unwrap(), "\"720p\"");
    }

    #[test]
    fn test_query_pairs_structured() {
        let query = SearchQuery::structured(
            Some("Тьма".to_string()),
            Some("Dark".to_string()),
            Some(2017),
        )
        .with_content_type(ContentType::Serial)
        .with_season(Some(2));

        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("title", "Тьма".to_string())));
        assert!(pairs.contains(&("title_original", "Dark".to_string())));
        assert!(pairs.contains(&("year", "2017".to_string())));
        assert!(pairs.contains(&("is_serial", "2".to_string())));
        assert!(pairs.contains(&("category[]", "5000".to_string())));
        assert!(pairs.contains(&("season", "2".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "query"));
    }

    #[test]
    fn test_query_pairs_skips_empty_strings() {
        let query = SearchQuery::structured(Some("".to_string()), Some("Dark".to_string()), None);
        let pairs = query.to_query_pairs();
        assert_eq!(pairs, vec![("title_original", "Dark".to_string())]);
    }

    #[test]
    fn test_search_query_minimal_json() {
        let parsed: SearchQuery = serde_json::from_str(r#"{"query": "minimal"}"#).unwrap();
        assert_eq!(parsed.query.as_deref(), Some("minimal"));
        assert!(parsed.content_type.is_none());
        assert!(parsed.season.is_none());
    }
}
