//! Database schema migrations.
//!
//! Creates the five workspace tables and their recency indexes. Every
//! statement is `IF NOT EXISTS`, so running `tasknet init` repeatedly is
//! safe.
//!
//! Timestamps are stored as ISO 8601 text; tags are stored as a JSON array
//! in a text column.
//!
//! Searchable text columns have a `*_fold` companion holding the Unicode
//! lowercase of the value, written on import. SQLite's `LIKE` only folds
//! ASCII, so searches match against the folded copy.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        tags TEXT NOT NULL DEFAULT '[]',
        created_at TEXT,
        updated_at TEXT,
        title_fold TEXT,
        content_fold TEXT,
        tags_fold TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT,
        priority TEXT,
        due_date TEXT,
        tags TEXT NOT NULL DEFAULT '[]',
        created_at TEXT,
        updated_at TEXT,
        title_fold TEXT,
        description_fold TEXT,
        tags_fold TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        status TEXT,
        start_date TEXT,
        end_date TEXT,
        created_at TEXT,
        updated_at TEXT,
        name_fold TEXT,
        description_fold TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS wikis (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        tags TEXT NOT NULL DEFAULT '[]',
        created_at TEXT,
        updated_at TEXT,
        title_fold TEXT,
        content_fold TEXT,
        tags_fold TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        file_type TEXT,
        size INTEGER,
        created_at TEXT,
        name_fold TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_notes_updated_at ON notes(updated_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_updated_at ON tasks(updated_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_projects_updated_at ON projects(updated_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_wikis_updated_at ON wikis(updated_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(created_at DESC)",
];

/// Apply the schema to an open pool.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(*statement).execute(pool).await?;
    }
    Ok(())
}

/// `tasknet init`: open (creating if needed) the database and apply the
/// schema.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    tracing::info!(path = %config.db.path.display(), "schema up to date");
    pool.close().await;
    Ok(())
}
