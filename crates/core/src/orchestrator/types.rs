//! Types for the search orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned to callers of the orchestrator.
///
/// Only invalid input is an error; an upstream failure or an empty search
/// is an `Ok` with no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    /// The external identifier is not an IMDb or Kinopoisk id.
    #[error("invalid external id: {0}")]
    InvalidExternalId(String),

    /// Other malformed caller input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Per-search options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Season constraint, honored for serial searches only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
}

impl SearchOptions {
    pub fn season(season: u32) -> Self {
        Self {
            season: Some(season),
        }
    }
}

/// Titles and year describing what to search for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleTarget {
    /// Localized title.
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub year: Option<u32>,
    /// IMDb id forwarded to the indexer.
    pub imdb: Option<String>,
}

impl TitleTarget {
    pub fn new(title: Option<String>, original_title: Option<String>, year: Option<u32>) -> Self {
        Self {
            title: non_blank(title),
            original_title: non_blank(original_title),
            year,
            imdb: None,
        }
    }

    pub fn with_imdb(mut self, imdb: Option<String>) -> Self {
        self.imdb = imdb;
        self
    }

    /// Original title if known, else the localized one.
    pub fn primary_title(&self) -> Option<&str> {
        self.original_title.as_deref().or(self.title.as_deref())
    }

    pub fn has_title(&self) -> bool {
        self.primary_title().is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_target_trims_blank_titles() {
        let target = TitleTarget::new(Some("  ".to_string()), Some(" Dark ".to_string()), None);
        assert!(target.title.is_none());
        assert_eq!(target.original_title.as_deref(), Some("Dark"));
        assert_eq!(target.primary_title(), Some("Dark"));
    }

    #[test]
    fn test_primary_title_falls_back_to_localized() {
        let target = TitleTarget::new(Some("Тьма".to_string()), None, Some(2017));
        assert_eq!(target.primary_title(), Some("Тьма"));
        assert!(target.has_title());
        assert!(!TitleTarget::default().has_title());
    }

    #[test]
    fn test_error_display() {
        let err = OrchestratorError::InvalidExternalId("abc".to_string());
        assert_eq!(err.to_string(), "invalid external id: abc");
    }
}
