//! Service layer for spantag business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services can be embedded by any host that renders the documents.

pub mod session;
pub mod store;

pub use session::{
    BatchOutcome, FetchTicket, LeaveDecision, OpenedDocument, SaveOutcome, Session, SessionEvent,
};
pub use store::{check_candidate, AnnotationStore};
