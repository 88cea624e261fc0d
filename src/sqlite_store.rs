//! SQLite-backed [`Store`] implementation.
//!
//! Each `find_*` method issues one `LIKE` query against its table. SQLite's
//! `LIKE` only folds ASCII, so the query is lowercased with
//! [`fold_case`] and matched against the `*_fold` columns written on import,
//! falling back to the raw column for rows that have none. Wildcard
//! characters in the user's query are escaped so they match literally. Tag
//! membership is tested with `json_each` over the JSON tags column, treating
//! invalid JSON as an empty array.
//!
//! Rows come back newest first by `julianday()` of the recency column, so
//! mixed offsets and date-only values order by instant rather than by text.
//! NULL and unparseable timestamps sort last.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use tasknet_core::models::{Document, Note, Project, Task, Wiki};
use tasknet_core::store::Store;
use tasknet_core::text::fold_case;

/// SQLite implementation of the [`Store`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Build a `%...%` pattern for `LIKE ... ESCAPE '\'`.
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Decode a JSON tags column. NULL or unparseable values become an empty
/// list so one bad row never fails a search.
pub(crate) fn parse_tags(raw: Option<String>, table: &str, id: &str) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(tags) => tags,
        Err(err) => {
            tracing::warn!(table, id, error = %err, "ignoring unparseable tags");
            Vec::new()
        }
    }
}

pub(crate) fn note_from_row(row: &SqliteRow) -> Note {
    let id: String = row.get("id");
    let tags = parse_tags(row.get("tags"), "notes", &id);
    Note {
        title: row.get("title"),
        content: row.get("content"),
        tags,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        id,
    }
}

pub(crate) fn task_from_row(row: &SqliteRow) -> Task {
    let id: String = row.get("id");
    let tags = parse_tags(row.get("tags"), "tasks", &id);
    Task {
        title: row.get("title"),
        description: row.get("description"),
        status: row.get("status"),
        priority: row.get("priority"),
        due_date: row.get("due_date"),
        tags,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        id,
    }
}

pub(crate) fn project_from_row(row: &SqliteRow) -> Project {
    Project {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        status: row.get("status"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub(crate) fn wiki_from_row(row: &SqliteRow) -> Wiki {
    let id: String = row.get("id");
    let tags = parse_tags(row.get("tags"), "wikis", &id);
    Wiki {
        title: row.get("title"),
        content: row.get("content"),
        tags,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        id,
    }
}

pub(crate) fn document_from_row(row: &SqliteRow) -> Document {
    Document {
        id: row.get("id"),
        name: row.get("name"),
        file_type: row.get("file_type"),
        size: row.get("size"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn find_notes(&self, query: &str, limit: usize) -> Result<Vec<Note>> {
        let pattern = like_pattern(&fold_case(query));
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, tags, created_at, updated_at
            FROM notes
            WHERE COALESCE(title_fold, title) LIKE ? ESCAPE '\'
               OR COALESCE(content_fold, content) LIKE ? ESCAPE '\'
               OR EXISTS (
                    SELECT 1 FROM json_each(
                        CASE WHEN json_valid(COALESCE(notes.tags_fold, notes.tags))
                             THEN COALESCE(notes.tags_fold, notes.tags) ELSE '[]' END
                    )
                    WHERE json_each.value LIKE ? ESCAPE '\'
               )
            ORDER BY julianday(updated_at) DESC
            LIMIT ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(table = "notes", rows = rows.len(), "source query");
        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn find_tasks(&self, query: &str, limit: usize) -> Result<Vec<Task>> {
        let pattern = like_pattern(&fold_case(query));
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, status, priority, due_date, tags,
                   created_at, updated_at
            FROM tasks
            WHERE COALESCE(title_fold, title) LIKE ? ESCAPE '\'
               OR COALESCE(description_fold, description) LIKE ? ESCAPE '\'
               OR EXISTS (
                    SELECT 1 FROM json_each(
                        CASE WHEN json_valid(COALESCE(tasks.tags_fold, tasks.tags))
                             THEN COALESCE(tasks.tags_fold, tasks.tags) ELSE '[]' END
                    )
                    WHERE json_each.value LIKE ? ESCAPE '\'
               )
            ORDER BY julianday(updated_at) DESC
            LIMIT ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(table = "tasks", rows = rows.len(), "source query");
        Ok(rows.iter().map(task_from_row).collect())
    }

    async fn find_projects(&self, query: &str, limit: usize) -> Result<Vec<Project>> {
        let pattern = like_pattern(&fold_case(query));
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, status, start_date, end_date,
                   created_at, updated_at
            FROM projects
            WHERE COALESCE(name_fold, name) LIKE ? ESCAPE '\'
               OR COALESCE(description_fold, description) LIKE ? ESCAPE '\'
            ORDER BY julianday(updated_at) DESC
            LIMIT ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(table = "projects", rows = rows.len(), "source query");
        Ok(rows.iter().map(project_from_row).collect())
    }

    async fn find_wikis(&self, query: &str, limit: usize) -> Result<Vec<Wiki>> {
        let pattern = like_pattern(&fold_case(query));
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, tags, created_at, updated_at
            FROM wikis
            WHERE COALESCE(title_fold, title) LIKE ? ESCAPE '\'
               OR COALESCE(content_fold, content) LIKE ? ESCAPE '\'
               OR EXISTS (
                    SELECT 1 FROM json_each(
                        CASE WHEN json_valid(COALESCE(wikis.tags_fold, wikis.tags))
                             THEN COALESCE(wikis.tags_fold, wikis.tags) ELSE '[]' END
                    )
                    WHERE json_each.value LIKE ? ESCAPE '\'
               )
            ORDER BY julianday(updated_at) DESC
            LIMIT ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(table = "wikis", rows = rows.len(), "source query");
        Ok(rows.iter().map(wiki_from_row).collect())
    }

    async fn find_documents(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        let pattern = like_pattern(&fold_case(query));
        let rows = sqlx::query(
            r#"
            SELECT id, name, file_type, size, created_at
            FROM documents
            WHERE COALESCE(name_fold, name) LIKE ? ESCAPE '\'
            ORDER BY julianday(created_at) DESC
            LIMIT ?
            "#,
        )
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(table = "documents", rows = rows.len(), "source query");
        Ok(rows.iter().map(document_from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DbConfig};
    use crate::db;
    use crate::import::import_snapshot;
    use crate::migrate::apply_schema;
    use tasknet_core::models::WorkspaceSnapshot;
    use tasknet_core::store::memory::InMemoryStore;
    use tempfile::TempDir;

    async fn test_store() -> (TempDir, SqliteStore) {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::minimal();
        config.db = DbConfig {
            path: tmp.path().join("tasknet.sqlite"),
        };
        let pool = db::connect(&config).await.unwrap();
        apply_schema(&pool).await.unwrap();
        (tmp, SqliteStore::new(pool))
    }

    fn note(id: &str, title: &str, content: &str, tags: &[&str], updated: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: None,
            updated_at: Some(updated.to_string()),
        }
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("budget"), "%budget%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\tmp"), "%c:\\\\tmp%");
    }

    #[test]
    fn test_parse_tags_falls_back_to_empty() {
        assert_eq!(
            parse_tags(Some(r#"["a","b"]"#.to_string()), "notes", "n1"),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(parse_tags(Some("not json".to_string()), "notes", "n1").is_empty());
        assert!(parse_tags(Some(r#"{"a":1}"#.to_string()), "notes", "n1").is_empty());
        assert!(parse_tags(None, "notes", "n1").is_empty());
    }

    #[tokio::test]
    async fn test_find_notes_matches_title_body_and_tags() {
        let (_tmp, store) = test_store().await;
        let snapshot = WorkspaceSnapshot {
            notes: vec![
                note("n1", "Budget plan", "", &[], "2024-01-01"),
                note("n2", "Sync", "talked about the BUDGET", &[], "2024-02-01"),
                note("n3", "Standup", "nothing", &["budget-review"], "2024-03-01"),
                note("n4", "Groceries", "milk", &["home"], "2024-04-01"),
            ],
            ..Default::default()
        };
        import_snapshot(store.pool(), &snapshot).await.unwrap();

        let found = store.find_notes("budget", 10).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n3", "n2", "n1"]);
        assert_eq!(found[0].tags, vec!["budget-review".to_string()]);

        let limited = store.find_notes("budget", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_wildcards_match_literally() {
        let (_tmp, store) = test_store().await;
        let snapshot = WorkspaceSnapshot {
            notes: vec![
                note("n1", "1000 items", "", &[], "2024-01-01"),
                note("n2", "100% done", "", &[], "2024-01-02"),
            ],
            ..Default::default()
        };
        import_snapshot(store.pool(), &snapshot).await.unwrap();

        let found = store.find_notes("100%", 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "n2");
    }

    #[tokio::test]
    async fn test_unparseable_tags_do_not_fail_search() {
        let (_tmp, store) = test_store().await;
        sqlx::query(
            "INSERT INTO tasks (id, title, tags, updated_at) VALUES ('t1', 'Budget sign-off', 'not json', '2024-01-01')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let found = store.find_tasks("budget", 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].tags.is_empty());
    }

    #[tokio::test]
    async fn test_find_documents_orders_by_created_at() {
        let (_tmp, store) = test_store().await;
        let doc = |id: &str, name: &str, created: &str| Document {
            id: id.to_string(),
            name: name.to_string(),
            file_type: Some("pdf".to_string()),
            size: Some(100),
            created_at: Some(created.to_string()),
        };
        let snapshot = WorkspaceSnapshot {
            documents: vec![
                doc("d1", "budget-2023.pdf", "2023-01-01"),
                doc("d2", "budget-2024.pdf", "2024-01-01"),
                doc("d3", "minutes.pdf", "2025-01-01"),
            ],
            ..Default::default()
        };
        import_snapshot(store.pool(), &snapshot).await.unwrap();

        let found = store.find_documents("BUDGET", 10).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "d1"]);
        assert_eq!(found[0].size, Some(100));
    }

    #[tokio::test]
    async fn test_non_ascii_case_folding() {
        let (_tmp, store) = test_store().await;
        let snapshot = WorkspaceSnapshot {
            notes: vec![
                note("n1", "ÉTÉ CAFÉ plan", "", &[], "2024-01-01"),
                note("n2", "Standup", "", &["Équipe"], "2024-01-02"),
                note("n3", "Groceries", "milk", &[], "2024-01-03"),
            ],
            ..Default::default()
        };
        import_snapshot(store.pool(), &snapshot).await.unwrap();
        let memory = InMemoryStore::from_snapshot(snapshot);

        for query in ["café", "ÉQUIPE", "été"] {
            let sqlite_ids: Vec<String> = store
                .find_notes(query, 10)
                .await
                .unwrap()
                .into_iter()
                .map(|n| n.id)
                .collect();
            let memory_ids: Vec<String> = memory
                .find_notes(query, 10)
                .await
                .unwrap()
                .into_iter()
                .map(|n| n.id)
                .collect();
            assert_eq!(sqlite_ids.len(), 1, "{}", query);
            assert_eq!(sqlite_ids, memory_ids, "{}", query);
        }

        // stored values keep their original case
        let found = store.find_notes("équipe", 10).await.unwrap();
        assert_eq!(found[0].tags, vec!["Équipe".to_string()]);
    }

    #[tokio::test]
    async fn test_recency_order_compares_instants() {
        let (_tmp, store) = test_store().await;
        let snapshot = WorkspaceSnapshot {
            notes: vec![
                // 2024-03-02T04:00:00Z, newer despite sorting lower as text
                note("n1", "budget east", "", &[], "2024-03-01T23:00:00-05:00"),
                note("n2", "budget utc", "", &[], "2024-03-02T01:00:00Z"),
                note("n3", "budget day", "", &[], "2024-03-01"),
            ],
            ..Default::default()
        };
        import_snapshot(store.pool(), &snapshot).await.unwrap();
        let memory = InMemoryStore::from_snapshot(snapshot);

        let newest = store.find_notes("budget", 1).await.unwrap();
        assert_eq!(newest[0].id, "n1");

        let sqlite_ids: Vec<String> = store
            .find_notes("budget", 10)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        let memory_ids: Vec<String> = memory
            .find_notes("budget", 10)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(sqlite_ids, vec!["n1", "n2", "n3"]);
        assert_eq!(sqlite_ids, memory_ids);
    }

    #[tokio::test]
    async fn test_undated_rows_sort_last() {
        let (_tmp, store) = test_store().await;
        sqlx::query(
            "INSERT INTO tasks (id, title, tags, updated_at) VALUES \
             ('t1', 'Budget undated', '[]', NULL), \
             ('t2', 'Budget garbled', '[]', 'someday'), \
             ('t3', 'Budget dated', '[]', '2020-01-01')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let found = store.find_tasks("budget", 10).await.unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].id, "t3");
    }
}
