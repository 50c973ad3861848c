//! Search orchestrator.
//!
//! Turns a caller request (external id, title, or free text) into a
//! [`Cascade`] of indexer queries and returns the merged, classified and
//! capped result list:
//! - **External id**: resolve the title, then run the title cascade; if
//!   resolution fails, search the raw identifier as free text
//! - **Title**: structured search, season fallback, free-text fallback
//! - **Free text**: a single query

mod cascade;
mod types;

pub use cascade::{Cascade, Merge, Strategy, StrategyKind, Trigger};
pub use types::{OrchestratorError, SearchOptions, TitleTarget};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::metrics::{SEARCHES_TOTAL, SEARCH_RESULTS, TITLE_RESOLUTIONS};
use crate::searcher::{ContentType, SearchQuery, Searcher, TorrentRecord};
use crate::title_resolver::{ExternalId, TitleResolver};

/// Runs search cascades against a [`Searcher`].
///
/// Stateless between calls; one instance is shared by all requests.
pub struct SearchOrchestrator {
    searcher: Arc<dyn Searcher>,
    resolver: Option<Arc<dyn TitleResolver>>,
    config: SearchConfig,
}

impl SearchOrchestrator {
    pub fn new(searcher: Arc<dyn Searcher>, config: SearchConfig) -> Self {
        Self {
            searcher,
            resolver: None,
            config,
        }
    }

    /// Attach a title resolver for id-based searches.
    pub fn with_resolver(mut self, resolver: Arc<dyn TitleResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Search by IMDb or Kinopoisk id.
    ///
    /// Fails only when `id` is not a recognized identifier.
    pub async fn search_by_external_id(
        &self,
        id: &str,
        content_type: ContentType,
        options: SearchOptions,
    ) -> Result<Vec<TorrentRecord>, OrchestratorError> {
        let external_id: ExternalId = id
            .parse()
            .map_err(|_| OrchestratorError::InvalidExternalId(id.to_string()))?;
        validate_season(options.season)?;
        SEARCHES_TOTAL.with_label_values(&["external_id"]).inc();

        let cascade = match self.resolve(&external_id, content_type).await {
            Some(target) => {
                let target = target.with_imdb(external_id.imdb().map(str::to_string));
                Cascade::for_title(
                    &target,
                    content_type,
                    options.season,
                    self.config.season_fallback_threshold,
                )
            }
            None => {
                let query = SearchQuery::free_text(external_id.to_string())
                    .with_content_type(content_type);
                Cascade::for_free_text(query, content_type)
            }
        };

        let records = self.run(&cascade).await;
        info!(
            id = %external_id,
            content_type = %content_type,
            results = records.len(),
            "External id search complete"
        );
        Ok(records)
    }

    /// Search by titles without resolving an identifier.
    pub async fn search_by_title(
        &self,
        target: TitleTarget,
        content_type: ContentType,
        options: SearchOptions,
    ) -> Result<Vec<TorrentRecord>, OrchestratorError> {
        if !target.has_title() {
            return Err(OrchestratorError::InvalidInput(
                "title or original title is required".to_string(),
            ));
        }
        validate_season(options.season)?;
        SEARCHES_TOTAL.with_label_values(&["title"]).inc();

        let cascade = Cascade::for_title(
            &target,
            content_type,
            options.season,
            self.config.season_fallback_threshold,
        );
        let records = self.run(&cascade).await;
        debug!(
            title = ?target.primary_title(),
            content_type = %content_type,
            results = records.len(),
            "Title search complete"
        );
        Ok(records)
    }

    /// Search with a free-text query.
    pub async fn search_by_free_text(
        &self,
        query: &str,
        content_type: ContentType,
        year: Option<u32>,
    ) -> Result<Vec<TorrentRecord>, OrchestratorError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(OrchestratorError::InvalidInput(
                "query cannot be empty".to_string(),
            ));
        }
        SEARCHES_TOTAL.with_label_values(&["free_text"]).inc();

        let search = SearchQuery::free_text(query)
            .with_content_type(content_type)
            .with_year(year);
        let records = self
            .run(&Cascade::for_free_text(search, content_type))
            .await;
        debug!(query = query, results = records.len(), "Free-text search complete");
        Ok(records)
    }

    /// Season numbers present in a serial's search results, sorted ascending.
    pub async fn available_seasons(
        &self,
        target: TitleTarget,
    ) -> Result<Vec<u32>, OrchestratorError> {
        if !target.has_title() {
            return Err(OrchestratorError::InvalidInput(
                "title or original title is required".to_string(),
            ));
        }

        let query = SearchQuery::structured(
            target.title.clone(),
            target.original_title.clone(),
            target.year,
        )
        .with_content_type(ContentType::Serial);

        let records = self.searcher.search(&query).await;
        let seasons = crate::view::available_seasons(&records);
        debug!(
            title = ?target.primary_title(),
            seasons = ?seasons,
            "Available seasons"
        );
        Ok(seasons)
    }

    /// Resolve an id into titles; `None` means degrade to free text.
    async fn resolve(&self, id: &ExternalId, content_type: ContentType) -> Option<TitleTarget> {
        let Some(resolver) = &self.resolver else {
            TITLE_RESOLUTIONS.with_label_values(&["not_configured"]).inc();
            warn!(id = %id, "No title resolver configured, searching raw identifier");
            return None;
        };

        match resolver.resolve(id, content_type).await {
            Ok(resolved) => {
                TITLE_RESOLUTIONS.with_label_values(&["resolved"]).inc();
                debug!(
                    id = %id,
                    resolver = resolver.name(),
                    original = %resolved.original_title,
                    russian = %resolved.russian_title,
                    year = ?resolved.year,
                    "Resolved external id"
                );
                Some(TitleTarget::new(
                    Some(resolved.russian_title),
                    Some(resolved.original_title),
                    resolved.year,
                ))
                .filter(TitleTarget::has_title)
            }
            Err(e) => {
                TITLE_RESOLUTIONS.with_label_values(&[e.kind()]).inc();
                warn!(
                    id = %id,
                    resolver = resolver.name(),
                    error = %e,
                    "Title resolution failed, searching raw identifier"
                );
                None
            }
        }
    }

    async fn run(&self, cascade: &Cascade) -> Vec<TorrentRecord> {
        let mut records = cascade.run(self.searcher.as_ref()).await;
        records.truncate(self.config.result_cap);
        SEARCH_RESULTS.observe(records.len() as f64);
        records
    }
}

fn validate_season(season: Option<u32>) -> Result<(), OrchestratorError> {
    match season {
        Some(0) => Err(OrchestratorError::InvalidInput(
            "season must be a positive number".to_string(),
        )),
        _ => Ok(()),
    }
}
