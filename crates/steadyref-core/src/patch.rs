//! Patch IR: Span, Replacement, TextEdit and FixPlan for suggested fixes.
//!
//! This module implements the edit representation shared by every rule:
//! - Byte spans over an immutable source buffer
//! - Text edits as ordered (span, replacement text) pairs
//! - Validation (bounds, overlapping replacements)
//! - Reverse-order application against the original buffer
//! - Fix plans that serialize several suggestions for one file
//!
//! Edits never reference their own output. Every span in a [`TextEdit`] is an
//! offset into the buffer that was analyzed, so an edit can be validated and
//! applied without knowing which other edits exist.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// Hash type for content verification (SHA-256, stored as hex string for JSON compatibility).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute SHA-256 hash of the given bytes, returning hex-encoded string.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();
        ContentHash(hex::encode(result))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Core Types
// ============================================================================

/// Byte offsets into file content.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u64,
    /// End byte offset (exclusive).
    pub end: u64,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: u64, end: u64) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Create an empty span at `offset` (an insertion point).
    pub fn point(offset: u64) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span overlaps with another.
    ///
    /// Two spans overlap if they share any byte positions.
    /// Adjacent spans (one ends where another starts) do NOT overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Shift both offsets left by `base`, producing a span relative to `base`.
    ///
    /// Returns `None` if the span starts before `base`.
    pub fn relative_to(&self, base: u64) -> Option<Span> {
        if self.start < base {
            return None;
        }
        Some(Span::new(self.start - base, self.end - base))
    }

    /// The span as a `usize` range for slicing.
    pub fn as_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start as u64, range.end as u64)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// Edit Operations
// ============================================================================

/// The kind of edit operation, derived from a replacement's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Insert text at `span.start`.
    Insert,
    /// Delete the bytes in `span`.
    Delete,
    /// Replace the bytes in `span` with new text.
    Replace,
}

/// A single text change: the bytes in `span` become `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// Range of the original buffer being replaced.
    pub span: Span,
    /// The new text (empty for Delete).
    pub text: String,
}

impl Replacement {
    /// Create a replacement.
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Replacement {
            span,
            text: text.into(),
        }
    }

    /// The kind of operation this replacement performs.
    pub fn kind(&self) -> EditKind {
        if self.span.is_empty() {
            EditKind::Insert
        } else if self.text.is_empty() {
            EditKind::Delete
        } else {
            EditKind::Replace
        }
    }

    /// Check if two replacements cannot both be applied to the same buffer.
    ///
    /// Non-empty spans collide when they overlap. Two insertions collide when
    /// they target the same offset (their relative order would be undefined).
    /// An insertion collides with a replaced range only if it lies strictly
    /// inside it; inserting at either boundary is well-defined.
    pub fn collides_with(&self, other: &Replacement) -> bool {
        match (self.span.is_empty(), other.span.is_empty()) {
            (true, true) => self.span.start == other.span.start,
            (true, false) => other.span.start < self.span.start && self.span.start < other.span.end,
            (false, true) => self.span.start < other.span.start && other.span.start < self.span.end,
            (false, false) => self.span.overlaps(&other.span),
        }
    }
}

/// An ordered sequence of replacements over one original buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Replacements in the order they were produced.
    pub replacements: Vec<Replacement>,
}

impl TextEdit {
    /// Create an empty edit.
    pub fn new() -> Self {
        TextEdit::default()
    }

    /// Add an insertion at `offset`.
    pub fn insert(mut self, offset: u64, text: impl Into<String>) -> Self {
        self.replacements
            .push(Replacement::new(Span::point(offset), text));
        self
    }

    /// Add a replacement of `span`.
    pub fn replace(mut self, span: Span, text: impl Into<String>) -> Self {
        self.replacements.push(Replacement::new(span, text));
        self
    }

    /// Check if this edit contains any replacements.
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Number of replacements.
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    /// Iterate over the spans touched by this edit.
    pub fn spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.replacements.iter().map(|r| r.span)
    }

    /// The smallest span covering every replacement, if any.
    pub fn covering_span(&self) -> Option<Span> {
        let start = self.spans().map(|s| s.start).min()?;
        let end = self.spans().map(|s| s.end).max()?;
        Some(Span::new(start, end))
    }

    /// Check if any replacement of `self` collides with any replacement of `other`.
    pub fn collides_with(&self, other: &TextEdit) -> Option<(Span, Span)> {
        self.replacements.iter().find_map(|a| {
            other
                .replacements
                .iter()
                .find(|b| a.collides_with(b))
                .map(|b| (a.span, b.span))
        })
    }

    /// Validate this edit against a buffer of `source` text.
    ///
    /// Every span must lie within the buffer, start and end on UTF-8 character
    /// boundaries, and no two replacements may collide.
    pub fn validate(&self, source: &str) -> Result<(), PatchError> {
        let len = source.len() as u64;
        for r in &self.replacements {
            if r.span.end > len {
                return Err(PatchError::Conflict(Conflict::SpanOutOfBounds {
                    span: r.span,
                    file_len: len,
                }));
            }
            if !source.is_char_boundary(r.span.start as usize)
                || !source.is_char_boundary(r.span.end as usize)
            {
                return Err(PatchError::NotCharBoundary { span: r.span });
            }
        }
        for (i, a) in self.replacements.iter().enumerate() {
            for b in &self.replacements[i + 1..] {
                if a.collides_with(b) {
                    return Err(PatchError::Conflict(Conflict::OverlappingSpans {
                        edit1_span: a.span,
                        edit2_span: b.span,
                    }));
                }
            }
        }
        Ok(())
    }

    /// Apply this edit to `source`, returning the rewritten text.
    ///
    /// Replacements are applied in reverse offset order so every span stays
    /// valid against the original buffer.
    pub fn apply(&self, source: &str) -> Result<String, PatchError> {
        self.validate(source)?;
        Ok(splice(source, self.replacements.iter()))
    }
}

/// Splice non-colliding replacements into `source`.
///
/// At equal start offsets the replaced range is spliced before the insertion,
/// so an insertion lands in front of the replacement text.
fn splice<'a>(source: &str, replacements: impl Iterator<Item = &'a Replacement>) -> String {
    let mut ordered: Vec<&Replacement> = replacements.collect();
    ordered.sort_by(|a, b| {
        b.span
            .start
            .cmp(&a.span.start)
            .then_with(|| b.span.end.cmp(&a.span.end))
    });

    let mut content = source.to_string();
    for r in ordered {
        content.replace_range(r.span.as_range(), &r.text);
    }
    content
}

// ============================================================================
// Conflict Detection
// ============================================================================

/// A detected overlap or invalidation that prevents apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    /// Two replacements have colliding spans.
    OverlappingSpans { edit1_span: Span, edit2_span: Span },

    /// Span is out of bounds for the file.
    SpanOutOfBounds { span: Span, file_len: u64 },

    /// File content changed since it was analyzed.
    ContentChanged {
        expected: ContentHash,
        actual: ContentHash,
    },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::OverlappingSpans {
                edit1_span,
                edit2_span,
            } => write!(f, "overlapping edits at {} and {}", edit1_span, edit2_span),
            Conflict::SpanOutOfBounds { span, file_len } => {
                write!(f, "span {} out of bounds (file length {})", span, file_len)
            }
            Conflict::ContentChanged { expected, actual } => write!(
                f,
                "content changed since analysis (expected {}, found {})",
                expected, actual
            ),
        }
    }
}

/// Errors produced while validating or applying edits.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The edit conflicts with the buffer or another edit.
    #[error("conflict: {0}")]
    Conflict(Conflict),

    /// A span splits a multi-byte character.
    #[error("span {span} does not fall on character boundaries")]
    NotCharBoundary { span: Span },
}

// ============================================================================
// Fix Plans
// ============================================================================

/// A set of suggestions accepted for one file, applied in a single pass.
///
/// Suggestions computed independently may target the same insertion point
/// (two attributes of one component both anchoring before the same return
/// statement). A plan admits a suggestion only if none of its replacements
/// collide with an already admitted one; the caller re-analyzes the file to
/// obtain fresh suggestions for the rejected ones.
#[derive(Debug, Clone)]
pub struct FixPlan {
    content_hash: ContentHash,
    accepted: Vec<TextEdit>,
}

impl FixPlan {
    /// Create an empty plan for `source`.
    pub fn new(source: &str) -> Self {
        FixPlan {
            content_hash: ContentHash::compute(source.as_bytes()),
            accepted: Vec::new(),
        }
    }

    /// Hash of the content this plan was built against.
    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    /// Number of accepted edits.
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    /// Check if the plan has no accepted edits.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Try to admit `edit` into the plan.
    ///
    /// Returns the conflict if it collides with an accepted edit.
    pub fn admit(&mut self, edit: TextEdit) -> Result<(), Conflict> {
        for existing in &self.accepted {
            if let Some((edit1_span, edit2_span)) = existing.collides_with(&edit) {
                tracing::debug!(%edit1_span, %edit2_span, "rejecting colliding edit");
                return Err(Conflict::OverlappingSpans {
                    edit1_span,
                    edit2_span,
                });
            }
        }
        self.accepted.push(edit);
        Ok(())
    }

    /// Apply every accepted edit to `source` in one pass.
    ///
    /// Fails with [`Conflict::ContentChanged`] if `source` is not the content
    /// the plan was built against.
    pub fn apply(&self, source: &str) -> Result<String, PatchError> {
        let actual = ContentHash::compute(source.as_bytes());
        if actual != self.content_hash {
            return Err(PatchError::Conflict(Conflict::ContentChanged {
                expected: self.content_hash.clone(),
                actual,
            }));
        }
        for edit in &self.accepted {
            edit.validate(source)?;
        }
        Ok(splice(
            source,
            self.accepted.iter().flat_map(|e| e.replacements.iter()),
        ))
    }
}

// ============================================================================
// Patch Materialization
// ============================================================================

/// A single replacement as it appears in output (for JSON serialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputEdit {
    /// Workspace-relative file path.
    pub file: String,
    /// Byte range being replaced.
    pub span: Span,
    /// The kind of operation.
    pub kind: EditKind,
    /// Original text (for verification).
    pub old_text: String,
    /// Replacement text.
    pub new_text: String,
    /// 1-indexed line number (for display).
    pub line: u32,
    /// 1-indexed column (for display).
    pub col: u32,
}

/// Materialized patch output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializedPatch {
    /// Individual replacements (ordered by span.start).
    pub edits: Vec<OutputEdit>,
    /// Standard unified diff format.
    pub unified_diff: String,
}

impl TextEdit {
    /// Materialize this edit to output format for the file at `path`.
    pub fn materialize(&self, path: &str, source: &str) -> Result<MaterializedPatch, PatchError> {
        let rewritten = self.apply(source)?;

        let mut sorted: Vec<&Replacement> = self.replacements.iter().collect();
        sorted.sort_by_key(|r| (r.span.start, r.span.end));

        let edits = sorted
            .into_iter()
            .map(|r| {
                let (line, col) =
                    crate::text::byte_offset_to_position(source.as_bytes(), r.span.start as usize);
                OutputEdit {
                    file: path.to_string(),
                    span: r.span,
                    kind: r.kind(),
                    old_text: source[r.span.as_range()].to_string(),
                    new_text: r.text.clone(),
                    line,
                    col,
                }
            })
            .collect();

        Ok(MaterializedPatch {
            edits,
            unified_diff: crate::diff::generate_unified_diff(path, source, &rewritten),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod span_tests {
        use super::*;

        #[test]
        fn span_overlap_detection() {
            let a = Span::new(0, 5);
            let b = Span::new(3, 8);
            let c = Span::new(5, 10);
            assert!(a.overlaps(&b));
            assert!(b.overlaps(&a));
            // Adjacent spans do not overlap
            assert!(!a.overlaps(&c));
        }

        #[test]
        fn span_contains() {
            let outer = Span::new(0, 10);
            assert!(outer.contains(&Span::new(2, 5)));
            assert!(outer.contains(&outer));
            assert!(!outer.contains(&Span::new(5, 11)));
        }

        #[test]
        fn span_relative_to() {
            assert_eq!(Span::new(10, 14).relative_to(8), Some(Span::new(2, 6)));
            assert_eq!(Span::new(3, 4).relative_to(8), None);
        }

        #[test]
        #[should_panic(expected = "must be <= end")]
        fn span_new_invalid_range_panics() {
            let _ = Span::new(5, 2);
        }
    }

    mod replacement_tests {
        use super::*;

        #[test]
        fn kind_is_derived_from_shape() {
            assert_eq!(Replacement::new(Span::point(3), "x").kind(), EditKind::Insert);
            assert_eq!(Replacement::new(Span::new(3, 5), "").kind(), EditKind::Delete);
            assert_eq!(Replacement::new(Span::new(3, 5), "x").kind(), EditKind::Replace);
        }

        #[test]
        fn inserts_at_same_offset_collide() {
            let a = Replacement::new(Span::point(4), "a");
            let b = Replacement::new(Span::point(4), "b");
            assert!(a.collides_with(&b));
        }

        #[test]
        fn insert_at_replace_boundary_does_not_collide() {
            let insert = Replacement::new(Span::point(4), "a");
            let replace = Replacement::new(Span::new(4, 8), "b");
            assert!(!insert.collides_with(&replace));
            assert!(!replace.collides_with(&insert));
        }

        #[test]
        fn insert_inside_replace_collides() {
            let insert = Replacement::new(Span::point(5), "a");
            let replace = Replacement::new(Span::new(4, 8), "b");
            assert!(insert.collides_with(&replace));
            assert!(replace.collides_with(&insert));
        }
    }

    mod text_edit_tests {
        use super::*;

        #[test]
        fn apply_insert_and_replace() {
            let source = "return <ul items={[1]} />";
            let edit = TextEdit::new()
                .insert(0, "const x = 1\n")
                .replace(Span::new(18, 21), "x");
            let result = edit.apply(source).unwrap();
            assert_eq!(result, "const x = 1\nreturn <ul items={x} />");
        }

        #[test]
        fn apply_keeps_insert_before_replacement_at_same_start() {
            let source = "abc";
            let edit = TextEdit::new()
                .replace(Span::new(0, 1), "X")
                .insert(0, ">");
            assert_eq!(edit.apply(source).unwrap(), ">Xbc");
        }

        #[test]
        fn validate_rejects_out_of_bounds() {
            let edit = TextEdit::new().replace(Span::new(2, 10), "x");
            let err = edit.validate("abc").unwrap_err();
            assert!(matches!(
                err,
                PatchError::Conflict(Conflict::SpanOutOfBounds { file_len: 3, .. })
            ));
        }

        #[test]
        fn validate_rejects_overlap() {
            let edit = TextEdit::new()
                .replace(Span::new(0, 3), "x")
                .replace(Span::new(2, 4), "y");
            assert!(matches!(
                edit.validate("abcdef"),
                Err(PatchError::Conflict(Conflict::OverlappingSpans { .. }))
            ));
        }

        #[test]
        fn validate_rejects_split_character() {
            let edit = TextEdit::new().replace(Span::new(1, 2), "x");
            assert!(matches!(
                edit.validate("é"),
                Err(PatchError::NotCharBoundary { .. })
            ));
        }

        #[test]
        fn covering_span_spans_all_replacements() {
            let edit = TextEdit::new()
                .insert(10, "a")
                .replace(Span::new(2, 4), "b");
            assert_eq!(edit.covering_span(), Some(Span::new(2, 10)));
            assert_eq!(TextEdit::new().covering_span(), None);
        }

        #[test]
        fn materialize_reports_positions_in_offset_order() {
            let source = "a\nbb\nccc\n";
            let edit = TextEdit::new()
                .replace(Span::new(5, 8), "z")
                .insert(2, "y");
            let patch = edit.materialize("f.tsx", source).unwrap();
            assert_eq!(patch.edits.len(), 2);
            assert_eq!(patch.edits[0].line, 2);
            assert_eq!(patch.edits[0].kind, EditKind::Insert);
            assert_eq!(patch.edits[1].old_text, "ccc");
            assert_eq!((patch.edits[1].line, patch.edits[1].col), (3, 1));
            assert!(patch.unified_diff.contains("--- a/f.tsx"));
        }
    }

    mod fix_plan_tests {
        use super::*;

        #[test]
        fn plan_rejects_second_insert_at_same_anchor() {
            let source = "function A() {\n  return <a x={[1]} y={[2]} />\n}\n";
            let mut plan = FixPlan::new(source);
            let first = TextEdit::new()
                .insert(17, "const ax = 1\n  ")
                .replace(Span::new(30, 33), "ax");
            let second = TextEdit::new()
                .insert(17, "const ay = 2\n  ")
                .replace(Span::new(38, 41), "ay");
            plan.admit(first).unwrap();
            let conflict = plan.admit(second).unwrap_err();
            assert!(matches!(conflict, Conflict::OverlappingSpans { .. }));
            assert_eq!(plan.len(), 1);

            let fixed = plan.apply(source).unwrap();
            assert!(fixed.contains("const ax = 1\n  return <a x={ax} y={[2]} />"));
        }

        #[test]
        fn plan_applies_disjoint_edits_together() {
            let source = "aaa bbb ccc";
            let mut plan = FixPlan::new(source);
            plan.admit(TextEdit::new().replace(Span::new(0, 3), "x"))
                .unwrap();
            plan.admit(TextEdit::new().replace(Span::new(8, 11), "z"))
                .unwrap();
            assert_eq!(plan.apply(source).unwrap(), "x bbb z");
        }

        #[test]
        fn plan_refuses_changed_content() {
            let plan = FixPlan::new("original");
            assert!(matches!(
                plan.apply("modified"),
                Err(PatchError::Conflict(Conflict::ContentChanged { .. }))
            ));
        }
    }
}
