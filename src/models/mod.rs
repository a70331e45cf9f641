//! Data models for spantag.

mod document;
mod project;

pub use document::{Annotation, AnnotationKey, Document, DocumentStatus, DocumentSummary};
pub use project::{EntityClass, Project};
