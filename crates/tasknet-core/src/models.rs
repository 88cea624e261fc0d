//! Core data models for workspace search.
//!
//! The five record kinds ([`Note`], [`Task`], [`Project`], [`Wiki`],
//! [`Document`]) mirror the workspace tables. They are read-only during a
//! search. Every search call produces fresh [`SearchResult`]s and
//! [`Facets`], bundled into a [`SearchResponse`]; nothing here is persisted
//! by the search path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============ Source types ============

/// One of the five searchable content kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Note,
    Task,
    Project,
    Wiki,
    Document,
}

impl SourceType {
    /// All source types in fan-out order.
    pub const ALL: [SourceType; 5] = [
        SourceType::Note,
        SourceType::Task,
        SourceType::Project,
        SourceType::Wiki,
        SourceType::Document,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Note => "note",
            SourceType::Task => "task",
            SourceType::Project => "project",
            SourceType::Wiki => "wiki",
            SourceType::Document => "document",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which sources a search fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Only(SourceType),
}

/// Returned when a `type` parameter names no known source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type '{0}': expected all, notes, tasks, projects, wikis or documents")]
pub struct ParseSourceFilterError(pub String);

impl FromStr for SourceFilter {
    type Err = ParseSourceFilterError;

    /// Accepts `all` (or empty), the plural table names used by the HTTP API,
    /// and the singular type names used in results. Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let filter = match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => SourceFilter::All,
            "notes" | "note" => SourceFilter::Only(SourceType::Note),
            "tasks" | "task" => SourceFilter::Only(SourceType::Task),
            "projects" | "project" => SourceFilter::Only(SourceType::Project),
            "wikis" | "wiki" => SourceFilter::Only(SourceType::Wiki),
            "documents" | "document" => SourceFilter::Only(SourceType::Document),
            _ => return Err(ParseSourceFilterError(s.to_string())),
        };
        Ok(filter)
    }
}

impl SourceFilter {
    /// Source types enabled by this filter, in fan-out order.
    pub fn sources(&self) -> Vec<SourceType> {
        match self {
            SourceFilter::All => SourceType::ALL.to_vec(),
            SourceFilter::Only(t) => vec![*t],
        }
    }
}

// ============ Records ============

/// A free-form note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wiki {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// An uploaded file. Only the file name is searchable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Every record of the five tables, as exported, imported and searched
/// offline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSnapshot {
    pub notes: Vec<Note>,
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub wikis: Vec<Wiki>,
    pub documents: Vec<Document>,
}

impl WorkspaceSnapshot {
    /// Number of records of the given type.
    pub fn count(&self, source: SourceType) -> usize {
        match source {
            SourceType::Note => self.notes.len(),
            SourceType::Task => self.tasks.len(),
            SourceType::Project => self.projects.len(),
            SourceType::Wiki => self.wikis.len(),
            SourceType::Document => self.documents.len(),
        }
    }
}

// ============ Search output ============

/// Type-specific extras carried by a [`SearchResult`].
///
/// Serialized untagged as a flat camelCase object; the owning result's
/// `type` already identifies the variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultMetadata {
    #[serde(rename_all = "camelCase")]
    Note {
        tags: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_at: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_at: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Task {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        priority: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        due_date: Option<String>,
        tags: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_at: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_at: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Project {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        start_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_at: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_at: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Wiki {
        tags: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_at: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        updated_at: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Document {
        #[serde(skip_serializing_if = "Option::is_none")]
        file_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        created_at: Option<String>,
    },
}

impl ResultMetadata {
    /// Tags carried by the result; empty for untagged kinds.
    pub fn tags(&self) -> &[String] {
        match self {
            ResultMetadata::Note { tags, .. }
            | ResultMetadata::Task { tags, .. }
            | ResultMetadata::Wiki { tags, .. } => tags,
            _ => &[],
        }
    }

    pub fn updated_at(&self) -> Option<&str> {
        match self {
            ResultMetadata::Note { updated_at, .. }
            | ResultMetadata::Task { updated_at, .. }
            | ResultMetadata::Project { updated_at, .. }
            | ResultMetadata::Wiki { updated_at, .. } => updated_at.as_deref(),
            ResultMetadata::Document { .. } => None,
        }
    }

    /// Inbox messages carry a received timestamp; none of the searchable
    /// kinds do, so the recency chain always falls through.
    pub fn received_at(&self) -> Option<&str> {
        None
    }

    pub fn created_at(&self) -> Option<&str> {
        match self {
            ResultMetadata::Note { created_at, .. }
            | ResultMetadata::Task { created_at, .. }
            | ResultMetadata::Project { created_at, .. }
            | ResultMetadata::Wiki { created_at, .. }
            | ResultMetadata::Document { created_at, .. } => created_at.as_deref(),
        }
    }

    pub fn due_date(&self) -> Option<&str> {
        match self {
            ResultMetadata::Task { due_date, .. } => due_date.as_deref(),
            _ => None,
        }
    }

    pub fn start_date(&self) -> Option<&str> {
        match self {
            ResultMetadata::Project { start_date, .. } => start_date.as_deref(),
            _ => None,
        }
    }

    pub fn end_date(&self) -> Option<&str> {
        match self {
            ResultMetadata::Project { end_date, .. } => end_date.as_deref(),
            _ => None,
        }
    }
}

/// A single ranked hit. `id` is unique only together with `source_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub excerpt: String,
    /// Relevance in `[0.0, 1.0]`.
    pub score: f64,
    pub metadata: ResultMetadata,
}

/// Result count for one source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeFacet {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub count: usize,
}

/// Occurrence count for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagFacet {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub types: Vec<TypeFacet>,
    pub tags: Vec<TagFacet>,
}

/// A source that failed while failures were being isolated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub message: String,
}

/// The full answer to one search call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    /// Number of matches across all enabled sources before truncation.
    pub total_count: usize,
    pub facets: Facets,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_sources: Vec<SourceFailure>,
}

impl SearchResponse {
    /// The response for a blank query.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_parses_plural_and_singular() {
        assert_eq!("all".parse::<SourceFilter>().unwrap(), SourceFilter::All);
        assert_eq!("".parse::<SourceFilter>().unwrap(), SourceFilter::All);
        assert_eq!(
            "tasks".parse::<SourceFilter>().unwrap(),
            SourceFilter::Only(SourceType::Task)
        );
        assert_eq!(
            "Wiki".parse::<SourceFilter>().unwrap(),
            SourceFilter::Only(SourceType::Wiki)
        );
    }

    #[test]
    fn test_filter_rejects_unknown_type() {
        let err = "emails".parse::<SourceFilter>().unwrap_err();
        assert_eq!(err, ParseSourceFilterError("emails".to_string()));
        assert!(err.to_string().contains("invalid type"));
    }

    #[test]
    fn test_filter_sources() {
        assert_eq!(SourceFilter::All.sources().len(), 5);
        assert_eq!(
            SourceFilter::Only(SourceType::Document).sources(),
            vec![SourceType::Document]
        );
    }

    #[test]
    fn test_empty_response_shape() {
        let value = serde_json::to_value(SearchResponse::empty()).unwrap();
        assert_eq!(
            value,
            json!({"results": [], "totalCount": 0, "facets": {"types": [], "tags": []}})
        );
    }

    #[test]
    fn test_metadata_serializes_flat_camel_case() {
        let meta = ResultMetadata::Task {
            status: Some("open".to_string()),
            priority: None,
            due_date: Some("2024-05-01".to_string()),
            tags: vec!["urgent".to_string()],
            created_at: None,
            updated_at: None,
        };
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            value,
            json!({"status": "open", "dueDate": "2024-05-01", "tags": ["urgent"]})
        );
    }

    #[test]
    fn test_result_serializes_type_key() {
        let result = SearchResult {
            id: "d1".to_string(),
            source_type: SourceType::Document,
            title: "report.pdf".to_string(),
            content: None,
            excerpt: "report.pdf".to_string(),
            score: 1.0,
            metadata: ResultMetadata::Document {
                file_type: Some("pdf".to_string()),
                size: Some(2048),
                created_at: None,
            },
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], "document");
        assert!(value.get("content").is_none());
        assert_eq!(value["metadata"]["fileType"], "pdf");
        assert_eq!(value["metadata"]["size"], 2048);
    }

    #[test]
    fn test_snapshot_tolerates_missing_sections() {
        let snapshot: WorkspaceSnapshot =
            serde_json::from_str(r#"{"notes": [{"id": "n1", "title": "Hello"}]}"#).unwrap();
        assert_eq!(snapshot.count(SourceType::Note), 1);
        assert_eq!(snapshot.count(SourceType::Task), 0);
        assert!(snapshot.notes[0].tags.is_empty());
    }
}
