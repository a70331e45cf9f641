//! Wire-shape translation for the annotation REST contract.
//!
//! The backend speaks `{start_index, end_index, entity, text}` while the
//! engine works with `{start, end, label, text}` plus presentation-local
//! id and color. This module owns that translation; it must be exact and
//! round-trip preserving in both directions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Annotation, Document, DocumentStatus, Project};

/// An annotation as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAnnotation {
    pub start_index: usize,
    pub end_index: usize,
    pub entity: String,
    pub text: String,
}

/// `GET /documents/{id}` response shape.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentPayload {
    pub id: String,
    pub text: String,
    pub project_id: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub annotations: Vec<WireAnnotation>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DocumentPayload {
    /// Build the engine-side document record, leaving the annotation
    /// list to be translated separately.
    pub fn to_document(&self) -> Document {
        Document {
            id: self.id.clone(),
            text: self.text.clone(),
            project_id: self.project_id.clone(),
            status: self.status,
            filename: self.filename.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// `PUT /documents/{id}` request body.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentUpdate {
    pub annotations: Vec<WireAnnotation>,
    pub text: String,
    pub project_id: String,
    pub status: DocumentStatus,
}

/// `DELETE /documents/bulk-delete` request body.
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteRequest {
    pub document_ids: Vec<String>,
}

/// Translate one annotation to the wire shape.
pub fn to_wire(ann: &Annotation) -> WireAnnotation {
    WireAnnotation {
        start_index: ann.start,
        end_index: ann.end,
        entity: ann.label.clone(),
        text: ann.text.clone(),
    }
}

/// Translate an annotation set to the wire shape, preserving order.
pub fn annotations_to_wire(annotations: &[Annotation]) -> Vec<WireAnnotation> {
    annotations.iter().map(to_wire).collect()
}

/// Translate one wire annotation back to internal shape.
///
/// The entity name resolves to a display color through the project's
/// entity-class list; annotations whose class was deleted keep working
/// with the default swatch.
pub fn from_wire(wire: &WireAnnotation, project: &Project) -> Annotation {
    Annotation::new(
        wire.start_index,
        wire.end_index,
        &wire.entity,
        &wire.text,
        project.class_color(&wire.entity),
    )
}

/// Translate a fetched annotation set, resorting ascending by start.
pub fn annotations_from_wire(wire: &[WireAnnotation], project: &Project) -> Vec<Annotation> {
    let mut annotations: Vec<Annotation> = wire.iter().map(|w| from_wire(w, project)).collect();
    annotations.sort_by_key(|a| a.start);
    annotations
}
