//! Database statistics overview.
//!
//! Prints the database location and size plus a row count per workspace
//! table. Used by `tasknet stats` to confirm an import landed.

use anyhow::Result;
use sqlx::SqlitePool;

use tasknet_core::models::SourceType;

use crate::config::Config;
use crate::db;

/// Table backing each source type.
pub fn table_name(source: SourceType) -> &'static str {
    match source {
        SourceType::Note => "notes",
        SourceType::Task => "tasks",
        SourceType::Project => "projects",
        SourceType::Wiki => "wikis",
        SourceType::Document => "documents",
    }
}

/// Row count per source type, in fan-out order.
pub async fn table_counts(pool: &SqlitePool) -> Result<Vec<(SourceType, i64)>> {
    let mut counts = Vec::with_capacity(SourceType::ALL.len());
    for source in SourceType::ALL {
        // Table names come from a fixed match, never from input.
        let sql = format!("SELECT COUNT(*) FROM {}", table_name(source));
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(pool).await?;
        counts.push((source, count));
    }
    Ok(counts)
}

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let counts = table_counts(&pool).await?;
    pool.close().await;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);
    let total: i64 = counts.iter().map(|(_, n)| n).sum();

    println!("TaskNet Workspace — Database Stats");
    println!("==================================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!();
    println!("  {:<12} {:>8}", "TABLE", "ROWS");
    println!("  {}", "-".repeat(21));
    for (source, count) in &counts {
        println!("  {:<12} {:>8}", table_name(*source), count);
    }
    println!("  {}", "-".repeat(21));
    println!("  {:<12} {:>8}", "total", total);
    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
