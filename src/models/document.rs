//! Document and annotation models.
//!
//! A document's text is immutable once loaded; annotation spans are
//! character offsets into it. Every annotation carries the exact text of
//! its span, and `text == document.text[start..end]` must hold at all
//! times — save-time validation drops any annotation for which it no
//! longer does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::{char_len, slice_chars};

/// Workflow status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Pending,
    InProgress,
    Completed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Value identity of an annotation: `(start, end, label, text)`.
///
/// Ids and colors are presentation-local and excluded, so dirty tracking
/// compares what the backend would actually store.
pub type AnnotationKey = (usize, usize, String, String);

/// A span tagged with one entity class's label.
///
/// The id is a stable synthetic identifier assigned at creation time;
/// removal and relabel operate on it, never on positional indexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Stable identifier, never sent to the backend.
    pub id: Uuid,
    /// Start character offset (inclusive).
    pub start: usize,
    /// End character offset (exclusive).
    pub end: usize,
    /// Entity class name this span is tagged with.
    pub label: String,
    /// Exact text of the span.
    pub text: String,
    /// Display color resolved from the entity class.
    pub color: String,
}

impl Annotation {
    /// Create a new annotation with a fresh id.
    pub fn new(start: usize, end: usize, label: &str, text: &str, color: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            label: label.to_string(),
            text: text.to_string(),
            color: color.to_string(),
        }
    }

    /// Value identity used for dirty comparison and save payloads.
    pub fn key(&self) -> AnnotationKey {
        (
            self.start,
            self.end,
            self.label.clone(),
            self.text.clone(),
        )
    }

    /// Whether this annotation's offsets are still consistent with `text`.
    pub fn is_valid_for(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= char_len(text)
            && slice_chars(text, self.start, self.end) == Some(self.text.as_str())
    }
}

/// A document as fetched from the backend.
///
/// The annotation set is held separately (see `AnnotationStore`); this is
/// the canonical text plus metadata the session tracks per document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Backend identifier for this document.
    pub id: String,
    /// Canonical text, immutable for the lifetime of the session.
    pub text: String,
    /// Project this document belongs to.
    pub project_id: String,
    /// Current workflow status.
    pub status: DocumentStatus,
    /// Original filename when the document was uploaded from a file.
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// List-view shape returned when fetching a project's documents.
///
/// Unknown response fields are ignored, so this deserializes from either
/// full documents or trimmed summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub filename: Option<String>,
    /// Document text, used by list views to show a truncated preview.
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::InProgress,
            DocumentStatus::Completed,
        ] {
            assert_eq!(DocumentStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(DocumentStatus::from_str("archived"), None);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&DocumentStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_annotation_valid_for_matching_text() {
        let ann = Annotation::new(0, 5, "PERSON", "Alice", "#ffcdd2");
        assert!(ann.is_valid_for("Alice met Bob in Paris."));
    }

    #[test]
    fn test_annotation_invalid_when_text_drifts() {
        let ann = Annotation::new(0, 5, "PERSON", "Alice", "#ffcdd2");
        assert!(!ann.is_valid_for("Bob met Alice in Paris."));
    }

    #[test]
    fn test_annotation_invalid_when_out_of_range() {
        let ann = Annotation::new(20, 25, "PERSON", "Alice", "#ffcdd2");
        assert!(!ann.is_valid_for("short"));
        let inverted = Annotation::new(5, 5, "PERSON", "", "#ffcdd2");
        assert!(!inverted.is_valid_for("Alice met Bob"));
    }

    #[test]
    fn test_annotation_key_excludes_id_and_color() {
        let a = Annotation::new(0, 5, "PERSON", "Alice", "#ffcdd2");
        let b = Annotation::new(0, 5, "PERSON", "Alice", "#bbdefb");
        assert_ne!(a.id, b.id);
        assert_eq!(a.key(), b.key());
    }
}
