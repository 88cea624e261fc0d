//! Storage abstraction for workspace search.
//!
//! The [`Store`] trait is the query fan-out seam: one method per source
//! type, each returning the rows of that type that match a query. The
//! SQLite backend lives in the application crate; [`memory::InMemoryStore`]
//! backs tests and the offline mirror.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Document, Note, Project, Task, Wiki};

/// Read-only access to the five workspace tables.
///
/// Every `find_*` method has the same contract:
///
/// - `query` is already trimmed and non-empty.
/// - A row matches when the query is a case-insensitive substring of its
///   title-like field, its body-like field, or (for tagged kinds) one of its
///   tags.
/// - At most `limit` rows are returned, ordered by the source's recency
///   field descending (`updated_at`, or `created_at` for documents).
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_notes(&self, query: &str, limit: usize) -> Result<Vec<Note>>;

    async fn find_tasks(&self, query: &str, limit: usize) -> Result<Vec<Task>>;

    async fn find_projects(&self, query: &str, limit: usize) -> Result<Vec<Project>>;

    async fn find_wikis(&self, query: &str, limit: usize) -> Result<Vec<Wiki>>;

    /// Matches on the file name only.
    async fn find_documents(&self, query: &str, limit: usize) -> Result<Vec<Document>>;
}
