//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count Unicode scalar values (chars), not bytes
//!
//! For one-off lookups use [`byte_offset_to_position`]. When many offsets of
//! the same text are converted (the template parser does this for every
//! node), build a [`LineIndex`] once.

use crate::span::{Position, SourceSpan, Span};

/// Convert a byte offset to a 1-indexed line and column (Unicode-aware).
///
/// If `offset` exceeds the content length, returns the position at end of
/// content.
pub fn byte_offset_to_position(content: &str, offset: usize) -> Position {
    let mut line = 1u32;
    let mut col = 1u32;
    let mut current_offset = 0usize;

    for ch in content.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    Position::new(line, col)
}

/// Extract the text content of a span as a string.
///
/// Returns `None` if the span extends beyond content bounds or does not fall
/// on char boundaries.
pub fn extract_span_str<'a>(content: &'a str, span: &Span) -> Option<&'a str> {
    content.get(span.start..span.end)
}

/// Count the number of lines in the content.
///
/// An empty string has zero lines; a trailing newline does not start a new
/// line.
pub fn line_count(content: &str) -> usize {
    content.lines().count()
}

/// Precomputed line starts for repeated offset-to-position conversion.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    content: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Build the index for `content`.
    pub fn new(content: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex {
            content,
            line_starts,
        }
    }

    /// Convert a byte offset to a 1-indexed position.
    ///
    /// Offsets past the end clamp to the end of content.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.content.len());
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        let column = self
            .content
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        Position::new(line_idx as u32 + 1, column as u32 + 1)
    }

    /// Convert a byte span to a [`SourceSpan`].
    pub fn source_span(&self, span: Span) -> SourceSpan {
        SourceSpan::new(self.position(span.start), self.position(span.end))
    }

    /// Number of lines in the indexed content (a trailing newline opens a line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
