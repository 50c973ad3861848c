use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// External content identifier accepted by id-based searches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExternalId {
    /// IMDb title id, normalized to lowercase (`tt0133093`).
    Imdb(String),
    /// Kinopoisk numeric id (`kp301` or `301`).
    Kinopoisk(u64),
}

impl ExternalId {
    /// IMDb id, when this identifier is one.
    pub fn imdb(&self) -> Option<&str> {
        match self {
            ExternalId::Imdb(id) => Some(id),
            ExternalId::Kinopoisk(_) => None,
        }
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Imdb(id) => write!(f, "{}", id),
            ExternalId::Kinopoisk(id) => write!(f, "kp{}", id),
        }
    }
}

/// Error returned when a string is not a recognized external id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid external id: {0:?}")]
pub struct ParseExternalIdError(pub String);

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for ExternalId {
    type Err = ParseExternalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let invalid = || ParseExternalIdError(s.to_string());

        if let Some(digits) = normalized.strip_prefix("tt") {
            if all_digits(digits) {
                return Ok(ExternalId::Imdb(normalized));
            }
            return Err(invalid());
        }

        let digits = normalized.strip_prefix("kp").unwrap_or(&normalized);
        if all_digits(digits) {
            return digits
                .parse()
                .map(ExternalId::Kinopoisk)
                .map_err(|_| invalid());
        }

        Err(invalid())
    }
}

/// Canonical titles for an external id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTitle {
    /// Original (usually English) title; may be empty.
    pub original_title: String,
    /// Localized Russian title; may be empty.
    pub russian_title: String,
    pub year: Option<u32>,
}

impl ResolvedTitle {
    /// Preferred title for a free-text query.
    pub fn primary_title(&self) -> &str {
        if self.original_title.trim().is_empty() {
            &self.russian_title
        } else {
            &self.original_title
        }
    }

    pub fn is_empty(&self) -> bool {
        self.original_title.trim().is_empty() && self.russian_title.trim().is_empty()
    }
}

/// Errors from title resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Nothing matches the identifier.
    #[error("No title found for {0}")]
    NotFound(String),

    /// The resolver cannot look up this kind of identifier.
    #[error("Unsupported identifier: {0}")]
    Unsupported(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resolver not configured (missing API key, etc.).
    #[error("Resolver not configured: {0}")]
    NotConfigured(String),
}

impl ResolveError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::NotFound(_) => "not_found",
            ResolveError::Unsupported(_) => "unsupported",
            ResolveError::NotConfigured(_) => "not_configured",
            ResolveError::HttpError(_)
            | ResolveError::RateLimitExceeded
            | ResolveError::ApiError { .. }
            | ResolveError::ParseError(_) => "error",
        }
    }
}
