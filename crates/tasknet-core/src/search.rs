//! Multi-source search aggregation.
//!
//! The orchestrator operates entirely through the [`Store`] trait, with no
//! database or configuration dependencies.
//!
//! # Algorithm
//!
//! 1. Trim the query; a blank query returns [`SearchResponse::empty`]
//!    without touching the store.
//! 2. Clamp the limit into `[1, max_limit]` (default `default_limit`).
//! 3. For each enabled source, fetch up to `max(limit, per_source_limit)`
//!    matching rows, then score each row and cut its excerpt.
//! 4. Concatenate everything and build type/tag facets over the full list.
//! 5. Sort by score (desc), recency (desc).
//! 6. Truncate to the limit; `total_count` keeps the pre-truncation size.

use anyhow::Result;

use crate::excerpt::{excerpt, DEFAULT_RADIUS};
use crate::facets::{build_facets, DEFAULT_TAG_LIMIT};
use crate::models::{SearchResponse, SearchResult, SourceFailure, SourceFilter, SourceType};
use crate::rank::rank;
use crate::score::{score, Searchable};
use crate::store::Store;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

/// Search tuning parameters, decoupled from application config.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Limit used when the caller gives none.
    pub default_limit: i64,
    /// Upper clamp for any requested limit.
    pub max_limit: i64,
    /// Characters kept on each side of an excerpt match.
    pub excerpt_radius: usize,
    /// Maximum number of tag facet entries.
    pub tag_facet_limit: usize,
    /// Floor for the number of rows fetched per source. Rows beyond the
    /// result limit still count towards `total_count` and the facets; `1`
    /// fetches exactly `limit` rows per source.
    pub per_source_limit: usize,
    /// Skip and report failing sources instead of failing the whole search.
    pub isolate_failures: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            excerpt_radius: DEFAULT_RADIUS,
            tag_facet_limit: DEFAULT_TAG_LIMIT,
            per_source_limit: MAX_LIMIT as usize,
            isolate_failures: true,
        }
    }
}

/// Bundles all inputs for a single search invocation.
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    pub filter: SourceFilter,
    /// Requested limit, before clamping.
    pub limit: Option<i64>,
    pub params: SearchParams,
}

/// Parse a raw `limit` parameter. Non-numeric input counts as absent; an
/// integer too large for `i64` saturates so it still clamps by sign.
pub fn parse_limit(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// The limit actually applied: `requested` clamped into `[1, max_limit]`,
/// or `default_limit` when absent.
pub fn effective_limit(requested: Option<i64>, params: &SearchParams) -> usize {
    let max = params.max_limit.max(1);
    requested.unwrap_or(params.default_limit).clamp(1, max) as usize
}

/// Run a search against a [`Store`] backend.
///
/// This is the function every frontend (CLI, HTTP, offline mirror)
/// delegates to.
pub async fn search<S: Store + ?Sized>(
    store: &S,
    req: &SearchRequest<'_>,
) -> Result<SearchResponse> {
    let query = req.query.trim();
    if query.is_empty() {
        return Ok(SearchResponse::empty());
    }

    let limit = effective_limit(req.limit, &req.params);
    let fetch_limit = limit.max(req.params.per_source_limit);
    let radius = req.params.excerpt_radius;

    let mut aggregated: Vec<SearchResult> = Vec::new();
    let mut failed_sources: Vec<SourceFailure> = Vec::new();

    for source in req.filter.sources() {
        match fetch_source(store, source, query, fetch_limit, radius).await {
            Ok(mut rows) => aggregated.append(&mut rows),
            Err(err) if req.params.isolate_failures => failed_sources.push(SourceFailure {
                source_type: source,
                message: format!("{:#}", err),
            }),
            Err(err) => return Err(err.context(format!("{} search failed", source))),
        }
    }

    let facets = build_facets(&aggregated, req.params.tag_facet_limit);
    let total_count = aggregated.len();

    rank(&mut aggregated);
    aggregated.truncate(limit);

    Ok(SearchResponse {
        results: aggregated,
        total_count,
        facets,
        failed_sources,
    })
}

async fn fetch_source<S: Store + ?Sized>(
    store: &S,
    source: SourceType,
    query: &str,
    limit: usize,
    radius: usize,
) -> Result<Vec<SearchResult>> {
    let results = match source {
        SourceType::Note => to_results(store.find_notes(query, limit).await?, query, radius),
        SourceType::Task => to_results(store.find_tasks(query, limit).await?, query, radius),
        SourceType::Project => {
            to_results(store.find_projects(query, limit).await?, query, radius)
        }
        SourceType::Wiki => to_results(store.find_wikis(query, limit).await?, query, radius),
        SourceType::Document => {
            to_results(store.find_documents(query, limit).await?, query, radius)
        }
    };
    Ok(results)
}

fn to_results<R: Searchable>(rows: Vec<R>, query: &str, radius: usize) -> Vec<SearchResult> {
    rows.into_iter()
        .map(|row| {
            let score = score(&row, query);
            let excerpt = excerpt(row.excerpt_source(), query, radius);
            row.into_result(score, excerpt)
        })
        .collect()
}
