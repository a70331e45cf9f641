//! Offset resolution: rendered text selection to character span.
//!
//! The rendered document view mixes plain text runs with highlight marks
//! for existing annotations, so a raw selection range is anchored in a
//! node tree that does not align 1:1 with the logical text. This module
//! works on a DOM-free snapshot of that tree: the host captures the
//! ordered segments of the container plus the selection anchor, and the
//! resolver recomputes a character offset pair against the canonical
//! document text. The recomputed offsets are trusted over the raw range.

use serde::{Deserialize, Serialize};

use crate::error::AnnotateError;
use crate::models::Annotation;
use crate::utils::{char_len, slice_chars};

/// A half-open character-offset interval `[start, end)` into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Standard half-open interval intersection.
    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One run of rendered text inside the annotation container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain, unannotated text.
    Text(String),
    /// Highlighted text of an existing annotation.
    Mark(String),
}

impl Segment {
    pub fn content(&self) -> &str {
        match self {
            Self::Text(s) | Self::Mark(s) => s,
        }
    }
}

/// Snapshot of the rendered document container at selection time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFragment {
    segments: Vec<Segment>,
}

impl RenderedFragment {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Build the fragment the renderer would produce: plain runs between
    /// annotations, a mark per annotation, sorted by start offset.
    pub fn from_annotations(text: &str, annotations: &[Annotation]) -> Self {
        let mut sorted: Vec<&Annotation> = annotations.iter().collect();
        sorted.sort_by_key(|a| a.start);

        let mut segments = Vec::new();
        let mut cursor = 0;
        for ann in sorted {
            if ann.start > cursor {
                if let Some(run) = slice_chars(text, cursor, ann.start) {
                    segments.push(Segment::Text(run.to_string()));
                }
            }
            if let Some(run) = slice_chars(text, ann.start, ann.end) {
                segments.push(Segment::Mark(run.to_string()));
            }
            cursor = ann.end;
        }
        let total = char_len(text);
        if cursor < total {
            if let Some(run) = slice_chars(text, cursor, total) {
                segments.push(Segment::Text(run.to_string()));
            }
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Concatenated logical text of the fragment.
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::content).collect()
    }
}

/// A raw selection anchored inside the rendered container.
///
/// Captured by the host from the live selection API: the segment holding
/// the selection start, the character offset within that segment, and the
/// text the user visually selected.
#[derive(Debug, Clone)]
pub struct RawRange {
    /// Index of the segment containing the selection anchor.
    pub segment: usize,
    /// Character offset of the anchor within that segment.
    pub offset: usize,
    /// Text the user visually selected.
    pub selected: String,
}

/// Resolve a raw selection to a character span against `document_text`.
///
/// The span start is the character length of all rendered content before
/// the anchor, plus the in-segment offset; the end is start plus the
/// selected text length. Returns `Ok(None)` for an empty selection
/// (nothing to annotate) and `SelectionMismatch` when the recomputed
/// slice does not equal the selected text — which happens when rendering
/// injected or altered characters, or the range itself is stale.
pub fn resolve_selection(
    fragment: &RenderedFragment,
    range: &RawRange,
    document_text: &str,
) -> Result<Option<Span>, AnnotateError> {
    let selected = range.selected.trim();
    if selected.is_empty() {
        return Ok(None);
    }

    // The rendered fragment must mirror the canonical text exactly;
    // offsets counted against a divergent rendering would be garbage.
    if fragment.text() != document_text {
        return Err(AnnotateError::SelectionMismatch);
    }

    if range.segment >= fragment.segments.len() {
        return Err(AnnotateError::SelectionMismatch);
    }

    let prefix: usize = fragment
        .segments
        .iter()
        .take(range.segment)
        .map(|seg| char_len(seg.content()))
        .sum();
    let start = prefix + range.offset;
    let end = start + char_len(selected);

    match slice_chars(document_text, start, end) {
        Some(slice) if slice == selected => Ok(Some(Span::new(start, end))),
        _ => Err(AnnotateError::SelectionMismatch),
    }
}
