//! Editing session: multi-document cache, dirty tracking, and save
//! orchestration.
//!
//! A session lets a user annotate document A, navigate to document B
//! without an explicit save, and have A's edits preserved and later
//! bulk-saved. Per-document annotation sets live in the session for as
//! long as it exists; they do not survive a full reload.
//!
//! Separated from UI concerns — save progress is emitted as events and
//! the caller decides how to present them (toasts, log lines, etc.).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::{
    annotations_from_wire, annotations_to_wire, Backend, DocumentPayload, DocumentUpdate,
    WireAnnotation,
};
use crate::config::{SaveBehavior, SessionConfig};
use crate::error::AnnotateError;
use crate::models::{
    Annotation, AnnotationKey, Document, DocumentStatus, DocumentSummary, EntityClass, Project,
};
use crate::selection::{resolve_selection, RawRange, RenderedFragment};
use crate::services::store::AnnotationStore;
use crate::utils::DEFAULT_COLOR;

/// Events emitted during session save operations.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Save-all started.
    SaveStarted { total_documents: usize },
    /// An annotation failed the save-time integrity check and was
    /// excluded from the payload; the save proceeds without it.
    AnnotationDropped {
        document_id: String,
        start: usize,
        end: usize,
        label: String,
    },
    /// One document saved successfully.
    DocumentSaved { document_id: String },
    /// One document's save failed; other documents are unaffected.
    DocumentSaveFailed { document_id: String, error: String },
    /// Save-all finished.
    SaveComplete {
        succeeded: usize,
        failed: usize,
        dropped: usize,
    },
}

/// Result of saving one document.
#[derive(Debug, Clone, Copy)]
pub struct SaveOutcome {
    /// Annotations included in the payload.
    pub saved: usize,
    /// Annotations dropped by the integrity check.
    pub dropped: usize,
}

/// Result of a save-all batch.
///
/// Saves are per-document, not transactional across the batch: a failure
/// in one never rolls back successes in others, and callers must report
/// a mixed outcome distinctly from a total failure.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Document ids saved successfully.
    pub succeeded: Vec<String>,
    /// Document ids that failed, with the error message.
    pub failed: Vec<(String, String)>,
    /// Total annotations dropped by integrity checks.
    pub dropped: usize,
}

impl BatchOutcome {
    /// Some documents saved, some failed.
    pub fn is_partial_failure(&self) -> bool {
        !self.succeeded.is_empty() && !self.failed.is_empty()
    }

    /// Every attempted save failed.
    pub fn is_total_failure(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

/// What to do when leaving the session with unsaved changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    /// Abandon unsaved edits and leave.
    Discard,
    /// Save every dirty document, then leave if all saves succeeded.
    SaveAllThenLeave,
    /// Stay; the pre-attempt state is fully preserved.
    Cancel,
}

/// Handle pairing a document-open request with the epoch it was issued
/// under. A response applied with a stale ticket is discarded.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    epoch: u64,
    document_id: String,
}

impl FetchTicket {
    pub fn document_id(&self) -> &str {
        &self.document_id
    }
}

/// Everything fetched when opening a document: the document itself plus
/// its project and sibling list (fetched concurrently).
#[derive(Debug, Clone)]
pub struct OpenedDocument {
    pub payload: DocumentPayload,
    pub project: Project,
    pub siblings: Vec<DocumentSummary>,
}

/// One user's editing session over a project's documents.
///
/// All mutation goes through the single owner of this value, so within a
/// document the insert/remove/relabel operations are serialized and no
/// race is possible. Network fetches are split into begin/fetch/apply so
/// a host event loop can interleave them; the epoch guard in
/// `apply_open` drops responses that resolve after a newer open was
/// issued.
pub struct Session {
    backend: Arc<dyn Backend>,
    config: SessionConfig,
    project: Option<Project>,
    records: HashMap<String, Document>,
    stores: HashMap<String, AnnotationStore>,
    /// Value identity of the last-fetched (or last-saved) server set.
    baselines: HashMap<String, Vec<AnnotationKey>>,
    dirty: HashSet<String>,
    siblings: Vec<DocumentSummary>,
    current: Option<String>,
    selected_class: Option<EntityClass>,
    epoch: u64,
}

impl Session {
    pub fn new(backend: Arc<dyn Backend>, config: SessionConfig) -> Self {
        Self {
            backend,
            config,
            project: None,
            records: HashMap::new(),
            stores: HashMap::new(),
            baselines: HashMap::new(),
            dirty: HashSet::new(),
            siblings: Vec::new(),
            current: None,
            selected_class: None,
            epoch: 0,
        }
    }

    /// The backend this session talks to, for operations outside the
    /// editing flow (export, bulk delete).
    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    // ------------------------------------------------------------------
    // Opening documents
    // ------------------------------------------------------------------

    /// Start opening a document. Bumps the request epoch so any earlier
    /// in-flight open becomes stale.
    pub fn begin_open(&mut self, document_id: &str) -> FetchTicket {
        self.epoch += 1;
        FetchTicket {
            epoch: self.epoch,
            document_id: document_id.to_string(),
        }
    }

    /// Fetch the document, then its project and sibling list in parallel.
    pub async fn fetch_open(&self, ticket: &FetchTicket) -> Result<OpenedDocument, AnnotateError> {
        let payload = self.backend.get_document(&ticket.document_id).await?;
        let (project, siblings) = futures::join!(
            self.backend.get_project(&payload.project_id),
            self.backend.list_project_documents(&payload.project_id),
        );
        Ok(OpenedDocument {
            payload,
            project: project?,
            siblings: siblings?,
        })
    }

    /// Apply a completed fetch. Returns false when the ticket is stale
    /// (a newer open was issued while this one was in flight); the
    /// response is discarded and session state is unchanged.
    pub fn apply_open(&mut self, ticket: FetchTicket, opened: OpenedDocument) -> bool {
        if ticket.epoch != self.epoch {
            debug!(
                document_id = %ticket.document_id,
                "discarding stale document fetch"
            );
            return false;
        }
        let doc_id = ticket.document_id;

        let annotations = annotations_from_wire(&opened.payload.annotations, &opened.project);
        let baseline: Vec<AnnotationKey> = annotations.iter().map(Annotation::key).collect();

        // Edited-but-unsaved annotations cached from an earlier visit win
        // over the freshly fetched server set.
        self.stores
            .entry(doc_id.clone())
            .or_insert_with(|| AnnotationStore::from_annotations(annotations));
        self.baselines.insert(doc_id.clone(), baseline);
        self.records.insert(doc_id.clone(), opened.payload.to_document());
        self.project = Some(opened.project);
        self.siblings = opened.siblings;
        self.current = Some(doc_id.clone());
        self.refresh_dirty(&doc_id);
        true
    }

    /// Open a document end to end. Returns false when the response was
    /// superseded by a newer open and discarded.
    pub async fn open_document(&mut self, document_id: &str) -> Result<bool, AnnotateError> {
        let ticket = self.begin_open(document_id);
        let opened = self.fetch_open(&ticket).await?;
        Ok(self.apply_open(ticket, opened))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn current_document_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    pub fn siblings(&self) -> &[DocumentSummary] {
        &self.siblings
    }

    pub fn record(&self, document_id: &str) -> Option<&Document> {
        self.records.get(document_id)
    }

    pub fn store(&self, document_id: &str) -> Option<&AnnotationStore> {
        self.stores.get(document_id)
    }

    /// Sorted annotation view of the current document.
    pub fn current_annotations(&self) -> &[Annotation] {
        self.current
            .as_deref()
            .and_then(|id| self.stores.get(id))
            .map(|s| s.annotations())
            .unwrap_or(&[])
    }

    pub fn is_dirty(&self, document_id: &str) -> bool {
        self.dirty.contains(document_id)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Dirty document ids in stable order.
    pub fn dirty_documents(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.dirty.iter().cloned().collect();
        ids.sort();
        ids
    }

    // ------------------------------------------------------------------
    // Entity class selection
    // ------------------------------------------------------------------

    /// Keyboard shortcut: digit keys 1-9 select the Nth entity class.
    pub fn select_class_by_digit(&mut self, digit: u8) -> Option<&EntityClass> {
        if !(1..=9).contains(&digit) {
            return None;
        }
        let class = self
            .project
            .as_ref()?
            .entity_classes
            .get(usize::from(digit) - 1)?
            .clone();
        self.selected_class = Some(class);
        self.selected_class.as_ref()
    }

    /// Select an entity class by name.
    pub fn select_class(&mut self, name: &str) -> Option<&EntityClass> {
        let class = self.project.as_ref()?.find_class(name)?.clone();
        self.selected_class = Some(class);
        self.selected_class.as_ref()
    }

    pub fn selected_class(&self) -> Option<&EntityClass> {
        self.selected_class.as_ref()
    }

    // ------------------------------------------------------------------
    // Annotation mutation
    // ------------------------------------------------------------------

    /// Turn a raw text selection into an annotation on the current
    /// document, tagged with the selected entity class.
    ///
    /// No-ops (`Ok(None)`) when no class is selected, no document is
    /// open, or the selection is empty. Offset and overlap validation
    /// errors propagate for the host to surface; the annotation set is
    /// not mutated on rejection.
    pub fn annotate_selection(
        &mut self,
        fragment: &RenderedFragment,
        range: &RawRange,
    ) -> Result<Option<Uuid>, AnnotateError> {
        let Some(class) = self.selected_class.clone() else {
            return Ok(None);
        };
        let Some(doc_id) = self.current.clone() else {
            return Ok(None);
        };
        let record = self
            .records
            .get(&doc_id)
            .ok_or_else(|| AnnotateError::UnknownDocument(doc_id.clone()))?;

        let Some(span) = resolve_selection(fragment, range, &record.text)? else {
            return Ok(None);
        };
        let text = range.selected.trim().to_string();

        let store = self
            .stores
            .get_mut(&doc_id)
            .ok_or_else(|| AnnotateError::UnknownDocument(doc_id.clone()))?;
        let id = store.insert(span, &class.name, &text, &class.color)?;
        self.refresh_dirty(&doc_id);
        Ok(Some(id))
    }

    /// Remove an annotation from the current document by id.
    pub fn remove_annotation(&mut self, id: Uuid) -> Result<Annotation, AnnotateError> {
        let doc_id = self.require_current()?;
        let store = self
            .stores
            .get_mut(&doc_id)
            .ok_or_else(|| AnnotateError::UnknownDocument(doc_id.clone()))?;
        let removed = store.remove(id)?;
        self.refresh_dirty(&doc_id);
        Ok(removed)
    }

    /// Reassign an annotation's entity class via the class picker.
    pub fn relabel_annotation(
        &mut self,
        id: Uuid,
        class: &EntityClass,
    ) -> Result<(), AnnotateError> {
        let doc_id = self.require_current()?;
        let store = self
            .stores
            .get_mut(&doc_id)
            .ok_or_else(|| AnnotateError::UnknownDocument(doc_id.clone()))?;
        store.relabel(id, &class.name, &class.color)?;
        self.refresh_dirty(&doc_id);
        Ok(())
    }

    /// Throw away a document's live annotation set and rebuild it from
    /// the last-fetched server baseline, leaving the document clean.
    fn restore_baseline(&mut self, document_id: &str) {
        let baseline = self.baselines.get(document_id).cloned().unwrap_or_default();
        let annotations = baseline
            .into_iter()
            .map(|(start, end, label, text)| {
                let color = self
                    .project
                    .as_ref()
                    .map(|p| p.class_color(&label))
                    .unwrap_or(DEFAULT_COLOR);
                Annotation::new(start, end, &label, &text, color)
            })
            .collect();
        self.stores
            .insert(document_id.to_string(), AnnotationStore::from_annotations(annotations));
        self.dirty.remove(document_id);
    }

    fn require_current(&self) -> Result<String, AnnotateError> {
        self.current
            .clone()
            .ok_or_else(|| AnnotateError::UnknownDocument(String::from("<none>")))
    }

    /// Recompute the dirty flag for one document: dirty iff the live set
    /// differs by value from the last-fetched server set.
    fn refresh_dirty(&mut self, document_id: &str) {
        let live = self
            .stores
            .get(document_id)
            .map(|s| s.keys())
            .unwrap_or_default();
        let baseline = self.baselines.get(document_id).cloned().unwrap_or_default();
        if live != baseline {
            self.dirty.insert(document_id.to_string());
        } else {
            self.dirty.remove(document_id);
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Sibling document `direction` steps away from the current one
    /// (-1 previous, +1 next), if any.
    pub fn neighbor(&self, direction: isize) -> Option<&DocumentSummary> {
        let current = self.current.as_deref()?;
        let index = self.siblings.iter().position(|d| d.id == current)?;
        let target = index as isize + direction;
        if target < 0 {
            return None;
        }
        self.siblings.get(target as usize)
    }

    /// Navigate to the previous/next sibling without saving. The current
    /// document's live annotation set stays cached in the session, so
    /// its unsaved edits survive the switch.
    pub async fn navigate(&mut self, direction: isize) -> Result<bool, AnnotateError> {
        let Some(next_id) = self.neighbor(direction).map(|d| d.id.clone()) else {
            return Ok(false);
        };
        self.open_document(&next_id).await
    }

    /// Resolve a leave attempt. With no dirty documents callers should
    /// leave directly; with dirty documents the user's decision arrives
    /// here. Returns whether leaving may proceed.
    pub async fn leave(
        &mut self,
        decision: LeaveDecision,
        event_tx: &mpsc::Sender<SessionEvent>,
    ) -> Result<bool, AnnotateError> {
        match decision {
            LeaveDecision::Cancel => Ok(false),
            LeaveDecision::Discard => {
                let dirty: Vec<String> = self.dirty.drain().collect();
                for document_id in dirty {
                    self.restore_baseline(&document_id);
                }
                Ok(true)
            }
            LeaveDecision::SaveAllThenLeave => {
                let outcome = self.save_all(event_tx).await?;
                // Failed documents stay dirty; leaving would lose them.
                Ok(outcome.failed.is_empty())
            }
        }
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Build the save payload for one document, dropping annotations
    /// that fail the integrity check against the canonical text.
    fn build_update(&self, document_id: &str) -> Option<(DocumentUpdate, Vec<Annotation>)> {
        let record = self.records.get(document_id)?;
        let store = self.stores.get(document_id)?;

        let mut valid = Vec::new();
        let mut dropped = Vec::new();
        for ann in store.annotations() {
            if ann.is_valid_for(&record.text) {
                valid.push(ann.clone());
            } else {
                warn!(
                    document_id,
                    start = ann.start,
                    end = ann.end,
                    label = %ann.label,
                    "dropping annotation inconsistent with document text"
                );
                dropped.push(ann.clone());
            }
        }

        let status = match self.config.save_behavior {
            SaveBehavior::KeepStatus => record.status,
            SaveBehavior::MarkCompleted => DocumentStatus::Completed,
        };

        let update = DocumentUpdate {
            annotations: annotations_to_wire(&valid),
            text: record.text.clone(),
            project_id: record.project_id.clone(),
            status,
        };
        Some((update, dropped))
    }

    fn apply_saved(&mut self, document_id: &str, update: &DocumentUpdate) {
        let saved_keys: Vec<AnnotationKey> = update
            .annotations
            .iter()
            .map(|w| {
                (
                    w.start_index,
                    w.end_index,
                    w.entity.clone(),
                    w.text.clone(),
                )
            })
            .collect();
        self.baselines.insert(document_id.to_string(), saved_keys);
        if let Some(record) = self.records.get_mut(document_id) {
            record.status = update.status;
        }
        self.dirty.remove(document_id);
    }

    /// Save every dirty document. Per-document requests are issued
    /// concurrently; one failure does not roll back the others.
    pub async fn save_all(
        &mut self,
        event_tx: &mpsc::Sender<SessionEvent>,
    ) -> Result<BatchOutcome, AnnotateError> {
        let dirty = self.dirty_documents();
        if dirty.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let _ = event_tx
            .send(SessionEvent::SaveStarted {
                total_documents: dirty.len(),
            })
            .await;

        let mut outcome = BatchOutcome::default();
        let mut jobs = Vec::new();
        for document_id in dirty {
            let Some((update, dropped)) = self.build_update(&document_id) else {
                warn!(document_id = %document_id, "missing data for dirty document");
                outcome
                    .failed
                    .push((document_id, "document not loaded".to_string()));
                continue;
            };
            for ann in &dropped {
                let _ = event_tx
                    .send(SessionEvent::AnnotationDropped {
                        document_id: document_id.clone(),
                        start: ann.start,
                        end: ann.end,
                        label: ann.label.clone(),
                    })
                    .await;
            }
            outcome.dropped += dropped.len();
            jobs.push((document_id, update));
        }

        let backend = self.backend.clone();
        let requests = jobs.into_iter().map(|(document_id, update)| {
            let backend = backend.clone();
            async move {
                let result = backend.put_document(&document_id, &update).await;
                (document_id, update, result)
            }
        });
        let results = futures::future::join_all(requests).await;

        for (document_id, update, result) in results {
            match result {
                Ok(_) => {
                    self.apply_saved(&document_id, &update);
                    let _ = event_tx
                        .send(SessionEvent::DocumentSaved {
                            document_id: document_id.clone(),
                        })
                        .await;
                    outcome.succeeded.push(document_id);
                }
                Err(err) => {
                    warn!(document_id = %document_id, error = %err, "document save failed");
                    let _ = event_tx
                        .send(SessionEvent::DocumentSaveFailed {
                            document_id: document_id.clone(),
                            error: err.to_string(),
                        })
                        .await;
                    outcome.failed.push((document_id, err.to_string()));
                }
            }
        }

        let _ = event_tx
            .send(SessionEvent::SaveComplete {
                succeeded: outcome.succeeded.len(),
                failed: outcome.failed.len(),
                dropped: outcome.dropped,
            })
            .await;
        Ok(outcome)
    }

    /// Save the current document only. Returns `Ok(None)` when it has no
    /// unsaved changes. A network failure propagates with local state
    /// untouched so the user can retry.
    pub async fn save_current(
        &mut self,
        event_tx: &mpsc::Sender<SessionEvent>,
    ) -> Result<Option<SaveOutcome>, AnnotateError> {
        let document_id = self.require_current()?;
        if !self.dirty.contains(&document_id) {
            return Ok(None);
        }
        let (update, dropped) = self
            .build_update(&document_id)
            .ok_or_else(|| AnnotateError::UnknownDocument(document_id.clone()))?;
        for ann in &dropped {
            let _ = event_tx
                .send(SessionEvent::AnnotationDropped {
                    document_id: document_id.clone(),
                    start: ann.start,
                    end: ann.end,
                    label: ann.label.clone(),
                })
                .await;
        }

        self.backend.put_document(&document_id, &update).await?;
        self.apply_saved(&document_id, &update);
        let _ = event_tx
            .send(SessionEvent::DocumentSaved {
                document_id: document_id.clone(),
            })
            .await;
        Ok(Some(SaveOutcome {
            saved: update.annotations.len(),
            dropped: dropped.len(),
        }))
    }

    /// Status toggle, independent of annotation saving: persists the
    /// last-known server annotation set with the new status, leaving
    /// local unsaved edits (and their dirty flags) untouched.
    pub async fn set_status(&mut self, status: DocumentStatus) -> Result<(), AnnotateError> {
        let document_id = self.require_current()?;
        let record = self
            .records
            .get(&document_id)
            .ok_or_else(|| AnnotateError::UnknownDocument(document_id.clone()))?;
        let baseline = self.baselines.get(&document_id).cloned().unwrap_or_default();
        let annotations = baseline
            .into_iter()
            .map(|(start, end, entity, text)| WireAnnotation {
                start_index: start,
                end_index: end,
                entity,
                text,
            })
            .collect();
        let update = DocumentUpdate {
            annotations,
            text: record.text.clone(),
            project_id: record.project_id.clone(),
            status,
        };

        self.backend.put_document(&document_id, &update).await?;
        if let Some(record) = self.records.get_mut(&document_id) {
            record.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Backend stub for the synchronous session logic; every call fails.
    struct NullBackend;

    #[async_trait]
    impl Backend for NullBackend {
        async fn get_document(&self, id: &str) -> Result<DocumentPayload, AnnotateError> {
            Err(AnnotateError::UnknownDocument(id.to_string()))
        }
        async fn put_document(
            &self,
            id: &str,
            _update: &DocumentUpdate,
        ) -> Result<DocumentPayload, AnnotateError> {
            Err(AnnotateError::UnknownDocument(id.to_string()))
        }
        async fn get_project(&self, id: &str) -> Result<Project, AnnotateError> {
            Err(AnnotateError::UnknownDocument(id.to_string()))
        }
        async fn list_project_documents(
            &self,
            _project_id: &str,
        ) -> Result<Vec<DocumentSummary>, AnnotateError> {
            Ok(Vec::new())
        }
        async fn bulk_delete(&self, _document_ids: &[String]) -> Result<(), AnnotateError> {
            Ok(())
        }
        async fn export_project(&self, _project_id: &str) -> Result<Vec<u8>, AnnotateError> {
            Ok(Vec::new())
        }
    }

    fn sample_project() -> Project {
        Project {
            id: "p1".to_string(),
            name: "News NER".to_string(),
            description: None,
            entity_classes: vec![
                EntityClass {
                    name: "PERSON".to_string(),
                    color: "#ffcdd2".to_string(),
                },
                EntityClass {
                    name: "LOCATION".to_string(),
                    color: "#bbdefb".to_string(),
                },
            ],
            created_at: None,
            updated_at: None,
        }
    }

    fn seeded_session() -> Session {
        let mut session = Session::new(Arc::new(NullBackend), SessionConfig::default());
        let ticket = session.begin_open("d1");
        let opened = OpenedDocument {
            payload: DocumentPayload {
                id: "d1".to_string(),
                text: "Alice met Bob in Paris.".to_string(),
                project_id: "p1".to_string(),
                status: DocumentStatus::Pending,
                annotations: Vec::new(),
                filename: None,
                created_at: None,
                updated_at: None,
            },
            project: sample_project(),
            siblings: vec![
                DocumentSummary {
                    id: "d1".to_string(),
                    status: DocumentStatus::Pending,
                    filename: None,
                    text: None,
                },
                DocumentSummary {
                    id: "d2".to_string(),
                    status: DocumentStatus::Pending,
                    filename: None,
                    text: None,
                },
            ],
        };
        assert!(session.apply_open(ticket, opened));
        session
    }

    #[test]
    fn test_select_class_by_digit() {
        let mut session = seeded_session();
        assert_eq!(session.select_class_by_digit(1).unwrap().name, "PERSON");
        assert_eq!(session.select_class_by_digit(2).unwrap().name, "LOCATION");
        assert!(session.select_class_by_digit(3).is_none());
        assert!(session.select_class_by_digit(0).is_none());
        // A miss leaves the previous selection in place.
        assert_eq!(session.selected_class().unwrap().name, "LOCATION");
    }

    #[test]
    fn test_annotate_selection_marks_dirty() {
        let mut session = seeded_session();
        session.select_class("PERSON").unwrap();
        let fragment = RenderedFragment::from_annotations("Alice met Bob in Paris.", &[]);
        let range = RawRange {
            segment: 0,
            offset: 0,
            selected: "Alice".to_string(),
        };
        let id = session.annotate_selection(&fragment, &range).unwrap();
        assert!(id.is_some());
        assert!(session.is_dirty("d1"));
        assert_eq!(session.current_annotations().len(), 1);
    }

    #[test]
    fn test_no_selected_class_is_noop() {
        let mut session = seeded_session();
        let fragment = RenderedFragment::from_annotations("Alice met Bob in Paris.", &[]);
        let range = RawRange {
            segment: 0,
            offset: 0,
            selected: "Alice".to_string(),
        };
        assert!(session.annotate_selection(&fragment, &range).unwrap().is_none());
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_remove_returns_to_clean() {
        let mut session = seeded_session();
        session.select_class("PERSON").unwrap();
        let fragment = RenderedFragment::from_annotations("Alice met Bob in Paris.", &[]);
        let range = RawRange {
            segment: 0,
            offset: 10,
            selected: "Bob".to_string(),
        };
        let id = session.annotate_selection(&fragment, &range).unwrap().unwrap();
        assert!(session.is_dirty("d1"));
        session.remove_annotation(id).unwrap();
        assert!(!session.is_dirty("d1"));
    }

    #[test]
    fn test_relabel_marks_dirty() {
        // Dirty compares value identity; color is presentation-local but
        // the label is not, so relabeling to another class marks dirty.
        let mut session = seeded_session();
        session.select_class("PERSON").unwrap();
        let fragment = RenderedFragment::from_annotations("Alice met Bob in Paris.", &[]);
        let range = RawRange {
            segment: 0,
            offset: 17,
            selected: "Paris".to_string(),
        };
        let id = session.annotate_selection(&fragment, &range).unwrap().unwrap();
        let location = sample_project().find_class("LOCATION").unwrap().clone();
        session.relabel_annotation(id, &location).unwrap();
        let ann = &session.current_annotations()[0];
        assert_eq!(ann.label, "LOCATION");
        assert!(session.is_dirty("d1"));
    }

    #[test]
    fn test_stale_fetch_discarded() {
        let mut session = seeded_session();
        let stale = session.begin_open("d2");
        let newer = session.begin_open("d1");
        let opened_for = |id: &str| OpenedDocument {
            payload: DocumentPayload {
                id: id.to_string(),
                text: "Alice met Bob in Paris.".to_string(),
                project_id: "p1".to_string(),
                status: DocumentStatus::Pending,
                annotations: Vec::new(),
                filename: None,
                created_at: None,
                updated_at: None,
            },
            project: sample_project(),
            siblings: Vec::new(),
        };
        assert!(!session.apply_open(stale, opened_for("d2")));
        assert_eq!(session.current_document_id(), Some("d1"));
        assert!(session.apply_open(newer, opened_for("d1")));
    }

    #[test]
    fn test_neighbor_navigation_bounds() {
        let session = seeded_session();
        assert_eq!(session.neighbor(1).unwrap().id, "d2");
        assert!(session.neighbor(-1).is_none());
    }

    #[test]
    fn test_batch_outcome_discrimination() {
        let partial = BatchOutcome {
            succeeded: vec!["a".to_string()],
            failed: vec![("b".to_string(), "boom".to_string())],
            dropped: 0,
        };
        assert!(partial.is_partial_failure());
        assert!(!partial.is_total_failure());

        let total = BatchOutcome {
            succeeded: Vec::new(),
            failed: vec![("b".to_string(), "boom".to_string())],
            dropped: 0,
        };
        assert!(total.is_total_failure());
        assert!(!total.is_partial_failure());

        assert!(!BatchOutcome::default().is_partial_failure());
        assert!(!BatchOutcome::default().is_total_failure());
    }
}
