//! Export the workspace as a JSON snapshot.
//!
//! The output has the same shape `tasknet import` and
//! `tasknet search --offline` read, so an export can seed another database
//! or be searched without one.

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

use tasknet_core::models::WorkspaceSnapshot;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::{
    document_from_row, note_from_row, project_from_row, task_from_row, wiki_from_row,
};

/// Read every row of the five tables, ordered by id.
pub async fn load_snapshot(pool: &SqlitePool) -> Result<WorkspaceSnapshot> {
    let notes = sqlx::query(
        "SELECT id, title, content, tags, created_at, updated_at FROM notes ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let tasks = sqlx::query(
        "SELECT id, title, description, status, priority, due_date, tags, created_at, updated_at \
         FROM tasks ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let projects = sqlx::query(
        "SELECT id, name, description, status, start_date, end_date, created_at, updated_at \
         FROM projects ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let wikis = sqlx::query(
        "SELECT id, title, content, tags, created_at, updated_at FROM wikis ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let documents =
        sqlx::query("SELECT id, name, file_type, size, created_at FROM documents ORDER BY id")
            .fetch_all(pool)
            .await?;

    Ok(WorkspaceSnapshot {
        notes: notes.iter().map(note_from_row).collect(),
        tasks: tasks.iter().map(task_from_row).collect(),
        projects: projects.iter().map(project_from_row).collect(),
        wikis: wikis.iter().map(wiki_from_row).collect(),
        documents: documents.iter().map(document_from_row).collect(),
    })
}

/// Export the workspace as JSON.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub async fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let pool = db::connect(config).await?;
    let snapshot = load_snapshot(&pool).await?;
    pool.close().await;

    let json = serde_json::to_string_pretty(&snapshot)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &json)?;
            eprintln!(
                "Exported {} notes, {} tasks, {} projects, {} wikis, {} documents to {}",
                snapshot.notes.len(),
                snapshot.tasks.len(),
                snapshot.projects.len(),
                snapshot.wikis.len(),
                snapshot.documents.len(),
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
