// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

use thiserror::Error;
use tug_core::span::{Position, Span};

/// A template that could not be parsed.
///
/// Every variant carries the byte span it refers to and the 1-indexed
/// position of the span's start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unclosed {what} at {position}")]
    Unclosed {
        what: String,
        span: Span,
        position: Position,
    },
    #[error("invalid expression at {position}: {message}")]
    InvalidExpression {
        message: String,
        span: Span,
        position: Position,
    },
    #[error("`{found}` at {position} does not close `{expected}`")]
    MismatchedClose {
        expected: String,
        found: String,
        span: Span,
        position: Position,
    },
    #[error("unexpected {what} at {position}")]
    Unexpected {
        what: String,
        span: Span,
        position: Position,
    },
    #[error("{what} at {position} are not supported")]
    Unsupported {
        what: &'static str,
        span: Span,
        position: Position,
    },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Unclosed { span, .. }
            | ParseError::InvalidExpression { span, .. }
            | ParseError::MismatchedClose { span, .. }
            | ParseError::Unexpected { span, .. }
            | ParseError::Unsupported { span, .. } => *span,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            ParseError::Unclosed { position, .. }
            | ParseError::InvalidExpression { position, .. }
            | ParseError::MismatchedClose { position, .. }
            | ParseError::Unexpected { position, .. }
            | ParseError::Unsupported { position, .. } => *position,
        }
    }

    /// Byte offset of the error in the source.
    pub fn offset(&self) -> usize {
        self.span().start
    }

    /// Short description used as the annotation label.
    pub fn label(&self) -> String {
        match self {
            ParseError::Unclosed { what, .. } => format!("unclosed {}", what),
            ParseError::InvalidExpression { message, .. } => message.clone(),
            ParseError::MismatchedClose { expected, .. } => {
                format!("expected `{{{{/{}}}}}`", expected)
            }
            ParseError::Unexpected { what, .. } => format!("unexpected {}", what),
            ParseError::Unsupported { what, .. } => format!("{} are not supported", what),
        }
    }
}
