//! Cascading search strategies.
//!
//! A cascade is an ordered list of [`Strategy`] values. Each strategy has a
//! trigger evaluated against the records accumulated so far; when it fires,
//! its query is sent, the results are classified (and optionally narrowed to
//! one season), then merged into the accumulator by magnet URI.

use std::fmt;

use tracing::debug;

use crate::detect::{classifier, season};
use crate::metrics::{STRATEGIES_EXECUTED, STRATEGY_RESULTS};
use crate::searcher::{
    dedup_by_magnet, merge_by_magnet, ContentType, SearchQuery, Searcher, TorrentRecord,
};

use super::types::TitleTarget;

/// Which step of the cascade a strategy implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Structured query by title, year and content type.
    Structured,
    /// Structured query without the season, narrowed locally.
    SeasonFallback,
    /// Free-text query built from the title after an empty structured search.
    FreeTextFallback,
    /// Plain free-text query.
    FreeText,
}

impl StrategyKind {
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::Structured => "structured",
            StrategyKind::SeasonFallback => "season_fallback",
            StrategyKind::FreeTextFallback => "free_text_fallback",
            StrategyKind::FreeText => "free_text",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// When a strategy runs, given the records accumulated so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Always,
    /// Fewer than `n` records so far.
    Below(usize),
    /// No records so far.
    Empty,
}

impl Trigger {
    fn fires(&self, accumulated: usize) -> bool {
        match self {
            Trigger::Always => true,
            Trigger::Below(n) => accumulated < *n,
            Trigger::Empty => accumulated == 0,
        }
    }
}

/// How a strategy's results combine with the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// Union by magnet URI, earlier records win.
    Union,
    /// Discard what was accumulated.
    Replace,
}

/// One search attempt.
#[derive(Debug, Clone)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub query: SearchQuery,
    pub trigger: Trigger,
    /// Keep only records mentioning this season.
    pub season_filter: Option<u32>,
    pub merge: Merge,
}

/// Ordered strategies for one search, classified against one content type.
#[derive(Debug, Clone)]
pub struct Cascade {
    content_type: ContentType,
    strategies: Vec<Strategy>,
}

impl Cascade {
    /// Title search: structured, then season fallback (serials with a season),
    /// then free-text fallback when nothing survived classification.
    pub fn for_title(
        target: &TitleTarget,
        content_type: ContentType,
        season: Option<u32>,
        season_threshold: usize,
    ) -> Self {
        let season = season.filter(|_| content_type == ContentType::Serial);

        let base = SearchQuery::structured(
            target.title.clone(),
            target.original_title.clone(),
            target.year,
        )
        .with_content_type(content_type)
        .with_imdb(target.imdb.clone());

        let mut strategies = vec![Strategy {
            kind: StrategyKind::Structured,
            query: base.clone().with_season(season),
            trigger: Trigger::Always,
            season_filter: None,
            merge: Merge::Union,
        }];

        if let Some(season) = season {
            strategies.push(Strategy {
                kind: StrategyKind::SeasonFallback,
                query: base,
                trigger: Trigger::Below(season_threshold),
                season_filter: Some(season),
                merge: Merge::Union,
            });
        }

        if let Some(text) = fallback_text(target, season) {
            strategies.push(Strategy {
                kind: StrategyKind::FreeTextFallback,
                query: SearchQuery::free_text(text)
                    .with_content_type(content_type)
                    .with_year(target.year),
                trigger: Trigger::Empty,
                season_filter: None,
                merge: Merge::Replace,
            });
        }

        Self {
            content_type,
            strategies,
        }
    }

    /// Single free-text query.
    pub fn for_free_text(query: SearchQuery, content_type: ContentType) -> Self {
        Self {
            content_type,
            strategies: vec![Strategy {
                kind: StrategyKind::FreeText,
                query,
                trigger: Trigger::Always,
                season_filter: None,
                merge: Merge::Replace,
            }],
        }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Run the cascade. Insertion order is preserved; nothing is ranked.
    pub async fn run(&self, searcher: &dyn Searcher) -> Vec<TorrentRecord> {
        let mut accumulated: Vec<TorrentRecord> = Vec::new();

        for strategy in &self.strategies {
            if !strategy.trigger.fires(accumulated.len()) {
                debug!(
                    strategy = %strategy.kind,
                    accumulated = accumulated.len(),
                    "Skipping strategy"
                );
                continue;
            }

            let label = strategy.kind.label();
            STRATEGIES_EXECUTED.with_label_values(&[label]).inc();

            let raw = searcher.search(&strategy.query).await;
            let raw_count = raw.len();

            let mut records = classifier::filter_by_content_type(raw, self.content_type);
            if let Some(wanted) = strategy.season_filter {
                records.retain(|r| season::mentions_season(&r.title, &r.seasons, wanted));
            }

            STRATEGY_RESULTS
                .with_label_values(&[label])
                .observe(records.len() as f64);
            debug!(
                strategy = label,
                raw = raw_count,
                kept = records.len(),
                "Strategy complete"
            );

            accumulated = match strategy.merge {
                Merge::Union => merge_by_magnet(accumulated, records),
                Merge::Replace => dedup_by_magnet(records),
            };
        }

        accumulated
    }
}

/// `"<original-or-title> <year>"`, plus `"season <n>"` when searching a season.
fn fallback_text(target: &TitleTarget, season: Option<u32>) -> Option<String> {
    let title = target.primary_title()?;

    let mut parts = vec![title.to_string()];
    if let Some(year) = target.year {
        parts.push(year.to_string());
    }
    if let Some(season) = season {
        parts.push(format!("season {}", season));
    }
    Some(parts.join(" "))
}
