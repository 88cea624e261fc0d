//! Relevance scoring and the per-kind [`Searchable`] descriptors.
//!
//! Scores live on a single normalized scale shared by the SQLite path and
//! the offline mirror:
//!
//! | Match | Score |
//! |-------|-------|
//! | Title-like field | [`TITLE_MATCH`] (1.0) |
//! | Body-like field | [`BODY_MATCH`] (0.8) |
//! | Any tag | [`TAG_MATCH`] (0.6) |
//! | Nothing | 0.0 |
//!
//! Tiers are exclusive: the first matching tier wins. Documents only have a
//! file name, so a hit there scores [`TITLE_MATCH`].

use crate::models::{
    Document, Note, Project, ResultMetadata, SearchResult, SourceType, Task, Wiki,
};
use crate::text::contains_ci;

pub const TITLE_MATCH: f64 = 1.0;
pub const BODY_MATCH: f64 = 0.8;
pub const TAG_MATCH: f64 = 0.6;

/// A record kind that the search orchestrator can score and convert.
///
/// Each of the five record kinds implements this once; the orchestrator and
/// the in-memory store are generic over it.
pub trait Searchable {
    const SOURCE_TYPE: SourceType;

    fn id(&self) -> &str;

    /// Title-like field (title, name or file name).
    fn primary_text(&self) -> &str;

    /// Body-like field (content or description), if the kind has one.
    fn body_text(&self) -> Option<&str> {
        None
    }

    fn tags(&self) -> &[String] {
        &[]
    }

    /// The source's own recency field, used to order rows per source.
    fn recency_field(&self) -> Option<&str>;

    /// Text the excerpt is cut from.
    fn excerpt_source(&self) -> &str {
        self.body_text().unwrap_or_else(|| self.primary_text())
    }

    fn into_result(self, score: f64, excerpt: String) -> SearchResult;
}

/// Score a record against a query.
pub fn score<R: Searchable>(record: &R, query: &str) -> f64 {
    if contains_ci(record.primary_text(), query) {
        TITLE_MATCH
    } else if record
        .body_text()
        .map(|body| contains_ci(body, query))
        .unwrap_or(false)
    {
        BODY_MATCH
    } else if record.tags().iter().any(|tag| contains_ci(tag, query)) {
        TAG_MATCH
    } else {
        0.0
    }
}

/// Whether a record belongs in the result set for `query`.
pub fn matches<R: Searchable>(record: &R, query: &str) -> bool {
    score(record, query) > 0.0
}

impl Searchable for Note {
    const SOURCE_TYPE: SourceType = SourceType::Note;

    fn id(&self) -> &str {
        &self.id
    }

    fn primary_text(&self) -> &str {
        &self.title
    }

    fn body_text(&self) -> Option<&str> {
        Some(&self.content)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn recency_field(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn into_result(self, score: f64, excerpt: String) -> SearchResult {
        SearchResult {
            id: self.id,
            source_type: Self::SOURCE_TYPE,
            title: self.title,
            content: Some(self.content),
            excerpt,
            score,
            metadata: ResultMetadata::Note {
                tags: self.tags,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

impl Searchable for Task {
    const SOURCE_TYPE: SourceType = SourceType::Task;

    fn id(&self) -> &str {
        &self.id
    }

    fn primary_text(&self) -> &str {
        &self.title
    }

    fn body_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn recency_field(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn into_result(self, score: f64, excerpt: String) -> SearchResult {
        SearchResult {
            id: self.id,
            source_type: Self::SOURCE_TYPE,
            title: self.title,
            content: self.description,
            excerpt,
            score,
            metadata: ResultMetadata::Task {
                status: self.status,
                priority: self.priority,
                due_date: self.due_date,
                tags: self.tags,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

impl Searchable for Project {
    const SOURCE_TYPE: SourceType = SourceType::Project;

    fn id(&self) -> &str {
        &self.id
    }

    fn primary_text(&self) -> &str {
        &self.name
    }

    fn body_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn recency_field(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn into_result(self, score: f64, excerpt: String) -> SearchResult {
        SearchResult {
            id: self.id,
            source_type: Self::SOURCE_TYPE,
            title: self.name,
            content: self.description,
            excerpt,
            score,
            metadata: ResultMetadata::Project {
                status: self.status,
                start_date: self.start_date,
                end_date: self.end_date,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

impl Searchable for Wiki {
    const SOURCE_TYPE: SourceType = SourceType::Wiki;

    fn id(&self) -> &str {
        &self.id
    }

    fn primary_text(&self) -> &str {
        &self.title
    }

    fn body_text(&self) -> Option<&str> {
        Some(&self.content)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn recency_field(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn into_result(self, score: f64, excerpt: String) -> SearchResult {
        SearchResult {
            id: self.id,
            source_type: Self::SOURCE_TYPE,
            title: self.title,
            content: Some(self.content),
            excerpt,
            score,
            metadata: ResultMetadata::Wiki {
                tags: self.tags,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

impl Searchable for Document {
    const SOURCE_TYPE: SourceType = SourceType::Document;

    fn id(&self) -> &str {
        &self.id
    }

    fn primary_text(&self) -> &str {
        &self.name
    }

    fn recency_field(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn into_result(self, score: f64, excerpt: String) -> SearchResult {
        SearchResult {
            id: self.id,
            source_type: Self::SOURCE_TYPE,
            title: self.name,
            content: None,
            excerpt,
            score,
            metadata: ResultMetadata::Document {
                file_type: self.file_type,
                size: self.size,
                created_at: self.created_at,
            },
        }
    }
}
