//! Torrent search API handlers.
//!
//! Handlers parse query strings, call the search orchestrator and shape the
//! results with the core view functions: quality filter, then sort, then the
//! requested grouping.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use torrentlens_core::view::{
    group_by_season_and_quality, QualityGroups, SeasonBucket, SeasonGroups,
};
use torrentlens_core::{
    filter_by_quality, group_by_quality, group_by_season, sort, ContentType, OrchestratorError,
    Quality, QualityFilter, SearchOptions, SortField, SortOrder, TitleTarget, TorrentRecord,
};

use super::handlers::{bad_request, ErrorResponse};
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

// ============================================================================
// Request types
// ============================================================================

/// Result shaping options shared by every search endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParams {
    /// Comma-separated quality labels to keep.
    pub quality: Option<String>,
    pub min_quality: Option<String>,
    pub max_quality: Option<String>,
    /// Comma-separated quality labels to drop.
    pub exclude_qualities: Option<String>,
    pub hdr: Option<String>,
    pub hevc: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub group_by_quality: Option<String>,
    pub group_by_season: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdSearchParams {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub season: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuerySearchParams {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleSearchParams {
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub year: Option<String>,
    pub season: Option<String>,
}

// ============================================================================
// Response types
// ============================================================================

/// Grouped results, shaped by which grouping flags were set.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Groups {
    Quality(QualityGroups),
    Season(SeasonGroups),
    SeasonAndQuality(BTreeMap<SeasonBucket, QualityGroups>),
}

/// Filtered, sorted and optionally grouped results.
#[derive(Debug, Serialize)]
pub struct ResultSet {
    pub total: usize,
    pub grouped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<TorrentRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Groups>,
}

#[derive(Debug, Serialize)]
pub struct IdSearchResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(flatten)]
    pub result: ResultSet,
}

#[derive(Debug, Serialize)]
pub struct QuerySearchResponse {
    pub query: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(flatten)]
    pub result: ResultSet,
}

#[derive(Debug, Serialize)]
pub struct TitleSearchResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(flatten)]
    pub result: ResultSet,
}

#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    pub seasons: Vec<u32>,
    pub total: usize,
}

// ============================================================================
// Parameter parsing
// ============================================================================

/// Non-blank, trimmed parameter value.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_param<T>(name: &str, value: Option<&String>) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    present(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| format!("invalid {} '{}': {}", name, v, e))
        })
        .transpose()
}

fn parse_flag(name: &str, value: Option<&String>) -> Result<Option<bool>, String> {
    match present(value).map(str::to_lowercase).as_deref() {
        None => Ok(None),
        Some("true" | "1" | "yes") => Ok(Some(true)),
        Some("false" | "0" | "no") => Ok(Some(false)),
        Some(other) => Err(format!("invalid {} '{}': expected true or false", name, other)),
    }
}

fn parse_list(value: Option<&String>) -> Vec<String> {
    present(value)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_content_type(value: Option<&String>) -> Result<ContentType, String> {
    Ok(parse_param("type", value)?.unwrap_or(ContentType::Movie))
}

/// Validated view options.
#[derive(Debug, Default)]
struct ViewOptions {
    filter: QualityFilter,
    sort_by: SortField,
    sort_order: SortOrder,
    by_quality: bool,
    by_season: bool,
}

impl TryFrom<&ViewParams> for ViewOptions {
    type Error = String;

    fn try_from(params: &ViewParams) -> Result<Self, Self::Error> {
        let filter = QualityFilter {
            qualities: parse_list(params.quality.as_ref()),
            min_quality: parse_param::<Quality>("minQuality", params.min_quality.as_ref())?,
            max_quality: parse_param::<Quality>("maxQuality", params.max_quality.as_ref())?,
            exclude_qualities: parse_list(params.exclude_qualities.as_ref()),
            hdr: parse_flag("hdr", params.hdr.as_ref())?,
            hevc: parse_flag("hevc", params.hevc.as_ref())?,
        };

        Ok(Self {
            filter,
            sort_by: parse_param("sortBy", params.sort_by.as_ref())?.unwrap_or_default(),
            sort_order: parse_param("sortOrder", params.sort_order.as_ref())?
                .unwrap_or_default(),
            by_quality: parse_flag("groupByQuality", params.group_by_quality.as_ref())?
                .unwrap_or(false),
            by_season: parse_flag("groupBySeason", params.group_by_season.as_ref())?
                .unwrap_or(false),
        })
    }
}

impl ViewOptions {
    fn apply(&self, records: Vec<TorrentRecord>) -> ResultSet {
        let records = filter_by_quality(records, &self.filter);
        let records = sort(records, self.sort_by, self.sort_order);
        let total = records.len();

        let groups = match (self.by_season, self.by_quality) {
            (true, true) => Some(Groups::SeasonAndQuality(group_by_season_and_quality(
                &records,
            ))),
            (true, false) => Some(Groups::Season(group_by_season(&records))),
            (false, true) => Some(Groups::Quality(group_by_quality(&records))),
            (false, false) => None,
        };

        match groups {
            Some(groups) => ResultSet {
                total,
                grouped: true,
                results: None,
                groups: Some(groups),
            },
            None => ResultSet {
                total,
                grouped: false,
                results: Some(records),
                groups: None,
            },
        }
    }
}

fn orchestrator_error(e: OrchestratorError) -> (StatusCode, Json<ErrorResponse>) {
    bad_request(e.to_string())
}

fn title_target(params: &TitleSearchParams) -> Result<TitleTarget, String> {
    let year = parse_param::<u32>("year", params.year.as_ref())?;
    Ok(TitleTarget::new(
        params.title.clone(),
        params.original_title.clone(),
        year,
    ))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/torrents/search/{id}
///
/// Search by IMDb or Kinopoisk id.
pub async fn search_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<IdSearchParams>,
    Query(view): Query<ViewParams>,
) -> ApiResult<IdSearchResponse> {
    let content_type = parse_content_type(params.content_type.as_ref()).map_err(bad_request)?;
    let season = parse_param::<u32>("season", params.season.as_ref()).map_err(bad_request)?;
    let view = ViewOptions::try_from(&view).map_err(bad_request)?;

    let records = state
        .orchestrator()
        .search_by_external_id(&id, content_type, SearchOptions { season })
        .await
        .map_err(orchestrator_error)?;

    Ok(Json(IdSearchResponse {
        id,
        content_type,
        season,
        result: view.apply(records),
    }))
}

/// GET /api/v1/torrents/search?query=
pub async fn search_by_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuerySearchParams>,
    Query(view): Query<ViewParams>,
) -> ApiResult<QuerySearchResponse> {
    let content_type = parse_content_type(params.content_type.as_ref()).map_err(bad_request)?;
    let year = parse_param::<u32>("year", params.year.as_ref()).map_err(bad_request)?;
    let view = ViewOptions::try_from(&view).map_err(bad_request)?;
    let query = params.query.unwrap_or_default();

    let records = state
        .orchestrator()
        .search_by_free_text(&query, content_type, year)
        .await
        .map_err(orchestrator_error)?;

    Ok(Json(QuerySearchResponse {
        query: query.trim().to_string(),
        content_type,
        year,
        result: view.apply(records),
    }))
}

async fn search_title(
    state: &AppState,
    content_type: ContentType,
    params: TitleSearchParams,
    view: ViewParams,
) -> ApiResult<TitleSearchResponse> {
    let target = title_target(&params).map_err(bad_request)?;
    let season = parse_param::<u32>("season", params.season.as_ref()).map_err(bad_request)?;
    let view = ViewOptions::try_from(&view).map_err(bad_request)?;

    let records = state
        .orchestrator()
        .search_by_title(target.clone(), content_type, SearchOptions { season })
        .await
        .map_err(orchestrator_error)?;

    Ok(Json(TitleSearchResponse {
        title: target.title,
        original_title: target.original_title,
        year: target.year,
        content_type,
        season,
        result: view.apply(records),
    }))
}

/// GET /api/v1/torrents/movies
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TitleSearchParams>,
    Query(view): Query<ViewParams>,
) -> ApiResult<TitleSearchResponse> {
    search_title(&state, ContentType::Movie, params, view).await
}

/// GET /api/v1/torrents/series
pub async fn search_series(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TitleSearchParams>,
    Query(view): Query<ViewParams>,
) -> ApiResult<TitleSearchResponse> {
    search_title(&state, ContentType::Serial, params, view).await
}

/// GET /api/v1/torrents/anime
pub async fn search_anime(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TitleSearchParams>,
    Query(view): Query<ViewParams>,
) -> ApiResult<TitleSearchResponse> {
    search_title(&state, ContentType::Anime, params, view).await
}

/// GET /api/v1/torrents/seasons
///
/// Season numbers found in a serial's search results.
pub async fn available_seasons(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TitleSearchParams>,
) -> ApiResult<SeasonsResponse> {
    let target = title_target(&params).map_err(bad_request)?;

    let seasons = state
        .orchestrator()
        .available_seasons(target.clone())
        .await
        .map_err(orchestrator_error)?;

    Ok(Json(SeasonsResponse {
        title: target.title,
        original_title: target.original_title,
        total: seasons.len(),
        seasons,
    }))
}
