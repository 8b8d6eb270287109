//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Line/column values of 0 are treated as 1 (defensive clamping)
//!
//! Columns count bytes. Tree-sitter reports byte offsets, and every span in a
//! [`TextEdit`](crate::patch::TextEdit) is a byte span, so the CLI's `--at`
//! positions use the same convention.

// ============================================================================
// Byte-based Conversions
// ============================================================================

/// Convert a byte offset to 1-indexed line and column.
///
/// If `offset` exceeds content length, returns position at end of content.
pub fn byte_offset_to_position(content: &[u8], offset: usize) -> (u32, u32) {
    let offset = offset.min(content.len());
    let mut line = 1u32;
    let mut col = 1u32;

    for &byte in &content[..offset] {
        if byte == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Convert 1-indexed line and column to byte offset.
///
/// A column beyond the end of its line is clamped to the line end. A line
/// beyond the content returns the content length.
pub fn position_to_byte_offset(content: &[u8], line: u32, col: u32) -> usize {
    let line = line.max(1);
    let col = col.max(1);

    let Some(start) = line_start(content, line) else {
        return content.len();
    };
    let line_end = content[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|p| start + p)
        .unwrap_or(content.len());
    let offset_in_line = (col as usize).saturating_sub(1);
    start + offset_in_line.min(line_end - start)
}

/// Byte offset of the first byte of a 1-indexed line, if the line exists.
fn line_start(content: &[u8], line: u32) -> Option<usize> {
    if line == 1 {
        return Some(0);
    }
    let mut current_line = 1u32;
    for (i, &byte) in content.iter().enumerate() {
        if byte == b'\n' {
            current_line += 1;
            if current_line == line {
                return Some(i + 1);
            }
        }
    }
    None
}

// ============================================================================
// Line Utilities
// ============================================================================

/// Byte offset of the start of the line containing `offset`.
pub fn line_start_of(content: &str, offset: usize) -> usize {
    let offset = offset.min(content.len());
    content[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte offset just past the end of the line containing `offset` (the
/// position of its `\n`, or the content length).
pub fn line_end_of(content: &str, offset: usize) -> usize {
    let offset = offset.min(content.len());
    content[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(content.len())
}

/// The leading whitespace of the line containing `offset`.
///
/// Only the whitespace before the first non-blank character counts, so for a
/// statement that starts mid-line this is the indentation of its line.
pub fn indentation_at(content: &str, offset: usize) -> &str {
    let start = line_start_of(content, offset);
    let line = &content[start..line_end_of(content, offset)];
    let width = line
        .bytes()
        .take_while(|&b| b == b' ' || b == b'\t')
        .count();
    &line[..width]
}

// ============================================================================
// Tests
// ============================================================================
