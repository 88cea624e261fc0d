//! Ranking: score first, best-effort recency second.
//!
//! Recency comes from an ordered chain of metadata accessors. The first
//! field that is present *and* parses as a date wins; a result with no
//! usable date ranks as the Unix epoch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;

use crate::models::{ResultMetadata, SearchResult};

type RecencyField = fn(&ResultMetadata) -> Option<&str>;

/// Fallback order for the recency key.
const RECENCY_FIELDS: [RecencyField; 6] = [
    ResultMetadata::updated_at,
    ResultMetadata::received_at,
    ResultMetadata::created_at,
    ResultMetadata::due_date,
    ResultMetadata::start_date,
    ResultMetadata::end_date,
];

/// Parse a stored timestamp into Unix milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (both with
/// optional fractional seconds, read as UTC) and bare `YYYY-MM-DD` dates.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Recency key of a result in Unix milliseconds; `0` when no field yields a
/// parseable date.
pub fn recency(metadata: &ResultMetadata) -> i64 {
    RECENCY_FIELDS
        .iter()
        .filter_map(|field| field(metadata))
        .find_map(parse_timestamp)
        .unwrap_or(0)
}

/// Sort results by score descending, then recency descending.
///
/// The sort is stable, so fully tied results keep aggregation order.
pub fn rank(results: &mut Vec<SearchResult>) {
    let mut keyed: Vec<(i64, SearchResult)> = results
        .drain(..)
        .map(|r| (recency(&r.metadata), r))
        .collect();

    keyed.sort_by(|(a_ts, a), (b_ts, b)| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(b_ts.cmp(a_ts))
    });

    results.extend(keyed.into_iter().map(|(_, r)| r));
}
