//! `tasknet search`: run a workspace search from the command line.
//!
//! Both the database path and the offline mirror go through
//! [`search_store`], which is also what the HTTP handler calls, so the CLI,
//! server and offline results are identical for the same data.

use anyhow::Result;
use std::path::Path;

use tasknet_core::models::{SearchResponse, SourceFilter};
use tasknet_core::search::{search, SearchRequest};
use tasknet_core::store::memory::InMemoryStore;
use tasknet_core::store::Store;

use crate::config::Config;
use crate::db;
use crate::import::read_snapshot;
use crate::sqlite_store::SqliteStore;

/// Run one search against any [`Store`] with the configured parameters.
///
/// Sources skipped because of an isolated failure are logged at `warn`.
pub async fn search_store<S: Store + ?Sized>(
    store: &S,
    config: &Config,
    query: &str,
    filter: SourceFilter,
    limit: Option<i64>,
) -> Result<SearchResponse> {
    let request = SearchRequest {
        query,
        filter,
        limit,
        params: config.search.params(),
    };
    let response = search(store, &request).await?;

    for failure in &response.failed_sources {
        tracing::warn!(
            source = %failure.source_type,
            error = %failure.message,
            "source skipped"
        );
    }
    tracing::debug!(
        query,
        total = response.total_count,
        returned = response.results.len(),
        "search finished"
    );

    Ok(response)
}

/// Entry point for `tasknet search`.
///
/// `source_type` accepts the same values as the HTTP `type` parameter; an
/// unknown value is an error. With `offline`, the snapshot file is searched
/// in memory and the database is never opened.
pub async fn run_search(
    config: &Config,
    query: &str,
    source_type: Option<&str>,
    limit: Option<i64>,
    json: bool,
    offline: Option<&Path>,
) -> Result<()> {
    let filter: SourceFilter = source_type.unwrap_or("all").parse()?;

    let response = match offline {
        Some(path) => {
            let store = InMemoryStore::from_snapshot(read_snapshot(path)?);
            search_store(&store, config, query, filter, limit).await?
        }
        None => {
            let pool = db::connect(config).await?;
            let store = SqliteStore::new(pool.clone());
            let response = search_store(&store, config, query, filter, limit).await;
            pool.close().await;
            response?
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

fn print_response(response: &SearchResponse) {
    if response.results.is_empty() {
        println!("No results.");
        return;
    }

    for (i, result) in response.results.iter().enumerate() {
        println!(
            "{}. [{:.2}] {} / {}",
            i + 1,
            result.score,
            result.source_type,
            result.title
        );
        if let Some(updated) = result.metadata.updated_at() {
            println!("    updated: {}", updated);
        }
        let tags = result.metadata.tags();
        if !tags.is_empty() {
            println!("    tags: {}", tags.join(", "));
        }
        println!(
            "    excerpt: \"{}\"",
            result.excerpt.replace('\n', " ").trim()
        );
        println!("    id: {}", result.id);
        println!();
    }

    println!(
        "Showing {} of {} results.",
        response.results.len(),
        response.total_count
    );

    let types: Vec<String> = response
        .facets
        .types
        .iter()
        .map(|f| format!("{} {}", f.source_type, f.count))
        .collect();
    println!("  types: {}", types.join(", "));

    if !response.facets.tags.is_empty() {
        let tags: Vec<String> = response
            .facets
            .tags
            .iter()
            .map(|f| format!("{} {}", f.tag, f.count))
            .collect();
        println!("  tags:  {}", tags.join(", "));
    }

    for failure in &response.failed_sources {
        println!("  skipped {}: {}", failure.source_type, failure.message);
    }
}
