use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::searcher::TorrentRecord;

/// Field to sort results by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Seeders,
    Size,
    Date,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seeders" => Ok(SortField::Seeders),
            "size" => Ok(SortField::Size),
            "date" => Ok(SortField::Date),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortField::Seeders => "seeders",
            SortField::Size => "size",
            SortField::Date => "date",
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// Sort key; a missing publish date counts as the epoch.
fn key(record: &TorrentRecord, field: SortField) -> i64 {
    match field {
        SortField::Seeders => record.seeders as i64,
        SortField::Size => record.size_bytes.min(i64::MAX as u64) as i64,
        SortField::Date => record.publish_date.map(|d| d.timestamp()).unwrap_or(0),
    }
}

/// Stable sort: records with equal keys keep their relative order.
pub fn sort(
    mut records: Vec<TorrentRecord>,
    field: SortField,
    order: SortOrder,
) -> Vec<TorrentRecord> {
    records.sort_by(|a, b| compare(a, b, field, order));
    records
}

pub(crate) fn compare(
    a: &TorrentRecord,
    b: &TorrentRecord,
    field: SortField,
    order: SortOrder,
) -> Ordering {
    let ordering = key(a, field).cmp(&key(b, field));
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}
