//! In-memory [`Store`] implementation for tests and the offline mirror.
//!
//! Holds a read-only [`WorkspaceSnapshot`]. Matching uses the same
//! [`Searchable`] descriptors as the scorer, so a row is returned exactly
//! when it would score above zero.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Document, Note, Project, Task, Wiki, WorkspaceSnapshot};
use crate::rank::parse_timestamp;
use crate::score::{matches, Searchable};

use super::Store;

/// In-memory store over a workspace snapshot.
pub struct InMemoryStore {
    snapshot: WorkspaceSnapshot,
}

impl InMemoryStore {
    pub fn from_snapshot(snapshot: WorkspaceSnapshot) -> Self {
        Self { snapshot }
    }
}

/// Matching rows, newest first by the source's recency field, capped at
/// `limit`. Rows without a parseable date sort last.
fn find_matching<R: Searchable + Clone>(rows: &[R], query: &str, limit: usize) -> Vec<R> {
    let mut hits: Vec<(i64, &R)> = rows
        .iter()
        .filter(|row| matches(*row, query))
        .map(|row| {
            let ts = row
                .recency_field()
                .and_then(parse_timestamp)
                .unwrap_or(i64::MIN);
            (ts, row)
        })
        .collect();
    hits.sort_by(|a, b| b.0.cmp(&a.0));
    hits.into_iter()
        .take(limit)
        .map(|(_, row)| row.clone())
        .collect()
}

#[async_trait]
impl Store for InMemoryStore {
    async fn find_notes(&self, query: &str, limit: usize) -> Result<Vec<Note>> {
        Ok(find_matching(&self.snapshot.notes, query, limit))
    }

    async fn find_tasks(&self, query: &str, limit: usize) -> Result<Vec<Task>> {
        Ok(find_matching(&self.snapshot.tasks, query, limit))
    }

    async fn find_projects(&self, query: &str, limit: usize) -> Result<Vec<Project>> {
        Ok(find_matching(&self.snapshot.projects, query, limit))
    }

    async fn find_wikis(&self, query: &str, limit: usize) -> Result<Vec<Wiki>> {
        Ok(find_matching(&self.snapshot.wikis, query, limit))
    }

    async fn find_documents(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
        Ok(find_matching(&self.snapshot.documents, query, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str, updated_at: Option<&str>) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: String::new(),
            tags: vec![],
            created_at: None,
            updated_at: updated_at.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_find_orders_newest_first_and_limits() {
        let store = InMemoryStore::from_snapshot(WorkspaceSnapshot {
            notes: vec![
                note("n1", "budget old", Some("2023-01-01")),
                note("n2", "budget undated", None),
                note("n3", "budget new", Some("2024-01-01")),
                note("n4", "roadmap", Some("2025-01-01")),
            ],
            ..Default::default()
        });

        let all = store.find_notes("budget", 10).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n3", "n1", "n2"]);

        let limited = store.find_notes("budget", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, "n3");
    }

    #[tokio::test]
    async fn test_tag_membership_includes_row() {
        let mut tagged = note("n1", "Standup", None);
        tagged.tags = vec!["Urgent".to_string()];
        let store = InMemoryStore::from_snapshot(WorkspaceSnapshot {
            notes: vec![tagged],
            ..Default::default()
        });
        assert_eq!(store.find_notes("urgent", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_snapshot_finds_nothing() {
        let store = InMemoryStore::from_snapshot(WorkspaceSnapshot::default());
        assert!(store.find_notes("budget", 10).await.unwrap().is_empty());
        assert!(store.find_documents("budget", 10).await.unwrap().is_empty());
    }
}
