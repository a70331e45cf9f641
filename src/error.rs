//! Error types for the annotation engine.
//!
//! Validation errors (`SelectionMismatch`, `OverlapConflict`) are recovered
//! locally by the caller and never reach the network layer. Network errors
//! leave local state untouched so the same action can be retried.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the annotation engine.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// Recomputed offsets do not slice back to the visually selected text.
    /// The add-annotation action is aborted; no silent correction is made.
    #[error("selected text does not match document text")]
    SelectionMismatch,

    /// Candidate span intersects an existing annotation or duplicates one.
    #[error("overlapping or duplicate annotation at [{start}, {end})")]
    OverlapConflict { start: usize, end: usize },

    /// Removal or relabel referenced an annotation id that is not in the set.
    #[error("no annotation with id {0}")]
    UnknownAnnotation(Uuid),

    /// Operation referenced a document the session has not loaded.
    #[error("document {0} is not loaded")]
    UnknownDocument(String),

    /// Transport-level failure talking to the backend.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },
}
