use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub indexer: IndexerConfig,
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Multi-indexer search endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexerConfig {
    /// Base URL (e.g., "http://redapi.cfhttp.top")
    #[serde(default = "default_indexer_url")]
    pub url: String,
    /// API key, omitted from requests when empty
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds (default: 8)
    #[serde(default = "default_indexer_timeout")]
    pub timeout_secs: u32,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: default_indexer_url(),
            api_key: String::new(),
            timeout_secs: default_indexer_timeout(),
        }
    }
}

fn default_indexer_url() -> String {
    "http://redapi.cfhttp.top".to_string()
}

fn default_indexer_timeout() -> u32 {
    8
}

/// TMDB title resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// TMDB API key (required)
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3)
    #[serde(default = "default_tmdb_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_tmdb_timeout")]
    pub timeout_secs: u32,
}

fn default_tmdb_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_timeout() -> u32 {
    10
}

/// Search cascade tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// A season-constrained search returning fewer records than this
    /// triggers the unconstrained season fallback (default: 5)
    #[serde(default = "default_season_threshold")]
    pub season_fallback_threshold: usize,
    /// Maximum number of records returned by a search (default: 20)
    #[serde(default = "default_result_cap")]
    pub result_cap: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            season_fallback_threshold: default_season_threshold(),
            result_cap: default_result_cap(),
        }
    }
}

fn default_season_threshold() -> usize {
    5
}

fn default_result_cap() -> usize {
    20
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub indexer: SanitizedIndexerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<SanitizedTmdbConfig>,
    pub search: SearchConfig,
}

/// Sanitized indexer config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedIndexerConfig {
    pub url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

/// Sanitized TMDB config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTmdbConfig {
    pub base_url: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            indexer: SanitizedIndexerConfig {
                url: config.indexer.url.clone(),
                api_key_configured: !config.indexer.api_key.is_empty(),
                timeout_secs: config.indexer.timeout_secs,
            },
            tmdb: config.tmdb.as_ref().map(|t| SanitizedTmdbConfig {
                base_url: t.base_url.clone(),
                api_key_configured: !t.api_key.is_empty(),
            }),
            search: config.search.clone(),
        }
    }
}
