//! Per-document annotation set with overlap validation.
//!
//! Annotation spans are flat NER-style tags: allowing overlaps would break
//! offset-based export and every downstream consumer that expects disjoint
//! ranges, so a candidate conflicting with any existing annotation is
//! rejected whole — there is no clipping.

use uuid::Uuid;

use crate::error::AnnotateError;
use crate::models::{Annotation, AnnotationKey};
use crate::selection::Span;

/// Decide whether a candidate span may join an existing annotation set.
///
/// Exact `(start, end)` duplicates are subsumed by the intersection test
/// but rejected explicitly first for clarity.
pub fn check_candidate(span: &Span, existing: &[Annotation]) -> Result<(), AnnotateError> {
    for ann in existing {
        if span.start == ann.start && span.end == ann.end {
            return Err(AnnotateError::OverlapConflict {
                start: span.start,
                end: span.end,
            });
        }
        if span.intersects(&Span::new(ann.start, ann.end)) {
            return Err(AnnotateError::OverlapConflict {
                start: span.start,
                end: span.end,
            });
        }
    }
    Ok(())
}

/// One document's annotation set, kept sorted ascending by start offset.
///
/// Insertion order is not semantically meaningful; the sorted view is the
/// only view, used for rendering and for save-time serialization alike.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from fetched annotations, resorting by start.
    pub fn from_annotations(mut annotations: Vec<Annotation>) -> Self {
        annotations.sort_by_key(|a| a.start);
        Self { annotations }
    }

    /// Insert a validated span, returning the new annotation's id.
    ///
    /// Rejected candidates leave the set untouched.
    pub fn insert(
        &mut self,
        span: Span,
        label: &str,
        text: &str,
        color: &str,
    ) -> Result<Uuid, AnnotateError> {
        check_candidate(&span, &self.annotations)?;
        let annotation = Annotation::new(span.start, span.end, label, text, color);
        let id = annotation.id;
        self.annotations.push(annotation);
        self.annotations.sort_by_key(|a| a.start);
        Ok(id)
    }

    /// Remove an annotation by its stable id.
    pub fn remove(&mut self, id: Uuid) -> Result<Annotation, AnnotateError> {
        let index = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or(AnnotateError::UnknownAnnotation(id))?;
        Ok(self.annotations.remove(index))
    }

    /// Reassign an annotation's label and color in place, span untouched.
    pub fn relabel(&mut self, id: Uuid, label: &str, color: &str) -> Result<(), AnnotateError> {
        let ann = self
            .annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AnnotateError::UnknownAnnotation(id))?;
        ann.label = label.to_string();
        ann.color = color.to_string();
        Ok(())
    }

    /// Sorted view of the set.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Value identities of the set, in sorted order.
    pub fn keys(&self) -> Vec<AnnotationKey> {
        self.annotations.iter().map(Annotation::key).collect()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_store() -> AnnotationStore {
        let mut store = AnnotationStore::new();
        store
            .insert(Span::new(10, 13), "PERSON", "Bob", "#ffcdd2")
            .unwrap();
        store
            .insert(Span::new(0, 5), "PERSON", "Alice", "#ffcdd2")
            .unwrap();
        store
    }

    #[test]
    fn test_insert_keeps_sorted_order() {
        let store = filled_store();
        let starts: Vec<usize> = store.annotations().iter().map(|a| a.start).collect();
        assert_eq!(starts, vec![0, 10]);
    }

    #[test]
    fn test_insert_rejects_overlap() {
        let mut store = filled_store();
        let err = store
            .insert(Span::new(2, 12), "PERSON", "ice met Bo", "#ffcdd2")
            .unwrap_err();
        assert!(matches!(err, AnnotateError::OverlapConflict { .. }));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_rejects_exact_duplicate() {
        let mut store = filled_store();
        let err = store
            .insert(Span::new(0, 5), "LOCATION", "Alice", "#bbdefb")
            .unwrap_err();
        assert!(matches!(err, AnnotateError::OverlapConflict { start: 0, end: 5 }));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_adjacent_spans_do_not_conflict() {
        let mut store = AnnotationStore::new();
        store
            .insert(Span::new(0, 5), "PERSON", "Alice", "#ffcdd2")
            .unwrap();
        assert!(store
            .insert(Span::new(5, 9), "PERSON", " met", "#ffcdd2")
            .is_ok());
    }

    #[test]
    fn test_remove_by_id() {
        let mut store = filled_store();
        let id = store.annotations()[0].id;
        let removed = store.remove(id).unwrap();
        assert_eq!(removed.text, "Alice");
        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.remove(id),
            Err(AnnotateError::UnknownAnnotation(_))
        ));
    }

    #[test]
    fn test_relabel_leaves_span_untouched() {
        let mut store = filled_store();
        let id = store.annotations()[0].id;
        store.relabel(id, "LOCATION", "#bbdefb").unwrap();
        let ann = &store.annotations()[0];
        assert_eq!(ann.label, "LOCATION");
        assert_eq!(ann.color, "#bbdefb");
        assert_eq!((ann.start, ann.end), (0, 5));
        assert_eq!(ann.text, "Alice");
    }

    #[test]
    fn test_resort_is_idempotent() {
        let store = filled_store();
        let before: Vec<_> = store.annotations().to_vec();
        let resorted = AnnotationStore::from_annotations(before.clone());
        assert_eq!(resorted.annotations(), before.as_slice());
    }

    #[test]
    fn test_no_overlap_invariant_holds_pairwise() {
        let mut store = filled_store();
        store
            .insert(Span::new(17, 22), "LOCATION", "Paris", "#bbdefb")
            .unwrap();
        let anns = store.annotations();
        for i in 0..anns.len() {
            for j in (i + 1)..anns.len() {
                let a = Span::new(anns[i].start, anns[i].end);
                let b = Span::new(anns[j].start, anns[j].end);
                assert!(!a.intersects(&b));
                assert_ne!((a.start, a.end), (b.start, b.end));
            }
        }
    }
}
