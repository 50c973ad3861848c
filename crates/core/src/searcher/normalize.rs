//! Mapping of raw indexer responses into [`TorrentRecord`]s.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::detect::{quality, season};

use super::TorrentRecord;

/// Source label stamped on every record produced by this normalizer.
pub const SOURCE_NAME: &str = "RedAPI";

/// Top-level indexer response. `Results` may be absent or not an array.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawResponse {
    #[serde(default)]
    Results: Option<Value>,
}

/// A single raw indexer entry.
#[derive(Debug, Default, Deserialize)]
#[allow(non_snake_case)]
pub struct RawEntry {
    #[serde(default)]
    pub Title: Option<String>,
    #[serde(default)]
    pub Tracker: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub Size: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub Seeders: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub Peers: Option<u64>,
    #[serde(default)]
    pub MagnetUri: Option<String>,
    #[serde(default)]
    pub PublishDate: Option<String>,
    #[serde(default)]
    pub CategoryDesc: Option<String>,
    #[serde(default)]
    pub Info: Option<RawInfo>,
    #[serde(default)]
    pub Details: Option<String>,
}

/// Indexer-supplied structured metadata.
#[derive(Debug, Default, Deserialize)]
pub struct RawInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub quality: Option<String>,
    #[serde(default)]
    pub voices: Option<Vec<String>>,
    #[serde(default)]
    pub types: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_u32_list")]
    pub seasons: Option<Vec<u32>>,
}

/// Parse a whole response body into records.
///
/// A body that is not JSON is an error; a JSON body without a `Results`
/// array is a degraded but valid response and yields an empty list.
pub fn parse_response(body: &str) -> Result<Vec<TorrentRecord>, serde_json::Error> {
    let response: RawResponse = serde_json::from_str(body)?;

    let entries = match response.Results {
        Some(Value::Array(entries)) => entries,
        Some(_) | None => {
            warn!("Indexer response has no Results array, treating as empty");
            return Ok(Vec::new());
        }
    };

    let total = entries.len();
    let records: Vec<TorrentRecord> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RawEntry>(entry) {
            Ok(raw) => Some(normalize(raw)),
            Err(e) => {
                debug!(error = %e, "Skipping unparsable indexer entry");
                None
            }
        })
        .collect();

    debug!(total = total, parsed = records.len(), "Indexer results normalized");
    Ok(records)
}

/// Map one raw entry into a record, deriving quality, HDR/HEVC and seasons.
pub fn normalize(raw: RawEntry) -> TorrentRecord {
    let title = raw.Title.unwrap_or_default();
    let info = raw.Info.unwrap_or_default();

    let detected = quality::detect(&title);
    let detected_quality = detected.tier.or_else(|| {
        info.quality
            .as_deref()
            .and_then(quality::parse_indexer_quality)
    });

    let structured_seasons: BTreeSet<u32> = info.seasons.unwrap_or_default().into_iter().collect();
    let seasons = season::extract(&title, &structured_seasons);

    TorrentRecord {
        tracker: raw.Tracker.unwrap_or_default(),
        source: SOURCE_NAME.to_string(),
        size_bytes: raw.Size.unwrap_or(0),
        seeders: clamp_u32(raw.Seeders),
        peers: clamp_u32(raw.Peers),
        magnet_uri: raw.MagnetUri.unwrap_or_default(),
        publish_date: raw.PublishDate.as_deref().and_then(parse_publish_date),
        category: raw.CategoryDesc.unwrap_or_default(),
        detected_quality,
        hdr: detected.hdr,
        hevc: detected.hevc,
        content_types: info
            .types
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect(),
        seasons,
        voices: info.voices.unwrap_or_default(),
        details_url: raw.Details.filter(|d| !d.is_empty()),
        title,
    }
}

fn clamp_u32(value: Option<u64>) -> u32 {
    value.unwrap_or(0).min(u32::MAX as u64) as u32
}

/// Parse the indexer's date format.
pub fn parse_publish_date(date_str: &str) -> Option<DateTime<Utc>> {
    // ISO 8601, with or without an offset
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}

fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_u64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_u32_list<'de, D>(deserializer: D) -> Result<Option<Vec<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(value_to_u64)
                .filter_map(|n| u32::try_from(n).ok())
                .collect(),
        ),
        _ => None,
    })
}
