//! Byte spans and line/column source locations.
//!
//! Two coordinate systems are used throughout tug-selectors:
//!
//! - [`Span`]: half-open byte range `[start, end)` into UTF-8 source. Used to
//!   slice the original text when printing untouched nodes.
//! - [`SourceSpan`]: start/end [`Position`]s (1-indexed line and column).
//!   Carried on template nodes as location metadata and used in reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Byte offsets into file content.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span overlaps with another.
    ///
    /// Adjacent spans (one ends where another starts) do NOT overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A 1-indexed line and column. Columns count Unicode scalar values.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Start/end positions of a node in the original source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: Position,
    pub end: Position,
}

impl SourceSpan {
    pub fn new(start: Position, end: Position) -> Self {
        SourceSpan { start, end }
    }

    /// A zero-width location at `pos`.
    pub fn point(pos: Position) -> Self {
        SourceSpan {
            start: pos,
            end: pos,
        }
    }

    /// Returns a copy whose end column is shifted right by `columns`.
    ///
    /// Used when text is appended to a single-line node after printing.
    pub fn extend_end_columns(self, columns: u32) -> Self {
        SourceSpan {
            start: self.start,
            end: Position::new(self.end.line, self.end.column + columns),
        }
    }

    /// Check if the span starts and ends on the same line.
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_len_and_empty() {
        let span = Span::new(4, 9);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(3, 3).is_empty());
    }

    #[test]
    #[should_panic(expected = "must be <= end")]
    fn span_rejects_inverted_range() {
        let _ = Span::new(5, 2);
    }

    #[test]
    fn span_overlap_excludes_adjacent() {
        assert!(!Span::new(0, 5).overlaps(&Span::new(5, 10)));
        assert!(Span::new(0, 6).overlaps(&Span::new(5, 10)));
        assert!(Span::new(0, 10).contains(&Span::new(2, 8)));
    }

    #[test]
    fn source_span_extend_end() {
        let loc = SourceSpan::new(Position::new(2, 7), Position::new(2, 20));
        let extended = loc.extend_end_columns(5);
        assert_eq!(extended.start, Position::new(2, 7));
        assert_eq!(extended.end, Position::new(2, 25));
        assert!(extended.is_single_line());
    }

    #[test]
    fn position_display() {
        assert_eq!(Position::new(3, 14).to_string(), "3:14");
        let loc = SourceSpan::new(Position::new(1, 1), Position::new(1, 4));
        assert_eq!(loc.to_string(), "1:1-1:4");
    }
}
