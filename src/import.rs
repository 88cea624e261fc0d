//! Load a workspace snapshot into the database.
//!
//! Records are upserted by primary key inside a single transaction, so a
//! failed import leaves the database untouched. Re-importing a record
//! overwrites it (last write wins).

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

use tasknet_core::models::{SourceType, WorkspaceSnapshot};
use tasknet_core::text::fold_case;

use crate::config::Config;
use crate::db;
use crate::migrate::apply_schema;

/// Parse a snapshot JSON file. Missing top-level arrays count as empty.
pub fn read_snapshot(path: &Path) -> Result<WorkspaceSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
}

fn tags_json(tags: &[String]) -> Result<String> {
    Ok(serde_json::to_string(tags)?)
}

fn folded_tags_json(tags: &[String]) -> Result<String> {
    let folded: Vec<String> = tags.iter().map(|t| fold_case(t)).collect();
    tags_json(&folded)
}

fn fold_opt(value: &Option<String>) -> Option<String> {
    value.as_deref().map(fold_case)
}

/// Upsert every record of `snapshot` in one transaction.
pub async fn import_snapshot(pool: &SqlitePool, snapshot: &WorkspaceSnapshot) -> Result<()> {
    let mut tx = pool.begin().await?;

    for note in &snapshot.notes {
        sqlx::query(
            r#"
            INSERT INTO notes (id, title, content, tags, created_at, updated_at,
                               title_fold, content_fold, tags_fold)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                tags = excluded.tags,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                title_fold = excluded.title_fold,
                content_fold = excluded.content_fold,
                tags_fold = excluded.tags_fold
            "#,
        )
        .bind(&note.id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(tags_json(&note.tags)?)
        .bind(&note.created_at)
        .bind(&note.updated_at)
        .bind(fold_case(&note.title))
        .bind(fold_case(&note.content))
        .bind(folded_tags_json(&note.tags)?)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to import note {}", note.id))?;
    }

    for task in &snapshot.tasks {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, status, priority, due_date, tags,
                               created_at, updated_at,
                               title_fold, description_fold, tags_fold)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                status = excluded.status,
                priority = excluded.priority,
                due_date = excluded.due_date,
                tags = excluded.tags,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                title_fold = excluded.title_fold,
                description_fold = excluded.description_fold,
                tags_fold = excluded.tags_fold
            "#,
        )
        .bind(&task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.status)
        .bind(&task.priority)
        .bind(&task.due_date)
        .bind(tags_json(&task.tags)?)
        .bind(&task.created_at)
        .bind(&task.updated_at)
        .bind(fold_case(&task.title))
        .bind(fold_opt(&task.description))
        .bind(folded_tags_json(&task.tags)?)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to import task {}", task.id))?;
    }

    for project in &snapshot.projects {
        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, status, start_date, end_date,
                                  created_at, updated_at, name_fold, description_fold)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                status = excluded.status,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                name_fold = excluded.name_fold,
                description_fold = excluded.description_fold
            "#,
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(&project.start_date)
        .bind(&project.end_date)
        .bind(&project.created_at)
        .bind(&project.updated_at)
        .bind(fold_case(&project.name))
        .bind(fold_opt(&project.description))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to import project {}", project.id))?;
    }

    for wiki in &snapshot.wikis {
        sqlx::query(
            r#"
            INSERT INTO wikis (id, title, content, tags, created_at, updated_at,
                               title_fold, content_fold, tags_fold)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                tags = excluded.tags,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at,
                title_fold = excluded.title_fold,
                content_fold = excluded.content_fold,
                tags_fold = excluded.tags_fold
            "#,
        )
        .bind(&wiki.id)
        .bind(&wiki.title)
        .bind(&wiki.content)
        .bind(tags_json(&wiki.tags)?)
        .bind(&wiki.created_at)
        .bind(&wiki.updated_at)
        .bind(fold_case(&wiki.title))
        .bind(fold_case(&wiki.content))
        .bind(folded_tags_json(&wiki.tags)?)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to import wiki {}", wiki.id))?;
    }

    for document in &snapshot.documents {
        sqlx::query(
            r#"
            INSERT INTO documents (id, name, file_type, size, created_at, name_fold)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                file_type = excluded.file_type,
                size = excluded.size,
                created_at = excluded.created_at,
                name_fold = excluded.name_fold
            "#,
        )
        .bind(&document.id)
        .bind(&document.name)
        .bind(&document.file_type)
        .bind(document.size)
        .bind(&document.created_at)
        .bind(fold_case(&document.name))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to import document {}", document.id))?;
    }

    tx.commit().await?;
    Ok(())
}

/// Entry point for `tasknet import <FILE>`.
pub async fn run_import(config: &Config, path: &Path) -> Result<()> {
    let snapshot = read_snapshot(path)?;

    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    import_snapshot(&pool, &snapshot).await?;
    pool.close().await;

    let counts: Vec<String> = SourceType::ALL
        .iter()
        .map(|source| format!("{} {}", snapshot.count(*source), source))
        .collect();
    tracing::info!(path = %path.display(), "snapshot imported");
    println!("Imported {}.", counts.join(", "));
    Ok(())
}
