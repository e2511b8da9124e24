//! Error types for migrations.
//!
//! [`MigrateError`] covers everything that can stop a run or a single
//! document. Each variant maps onto an [`OutputErrorCode`] so the CLI can
//! pick an exit status and a JSON error code.

use std::io;

use thiserror::Error;
use tug_core::error::OutputErrorCode;
use tug_core::filter::FilterError;
use tug_hbs::ParseError;

use crate::ops::promote::PromoteError;

/// Errors raised while migrating templates.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Bad glob pattern on the command line.
    #[error("{0}")]
    InvalidGlob(#[from] FilterError),

    /// Bad selector regular expression.
    #[error("invalid selector pattern: {0}")]
    InvalidSelectorPattern(#[from] regex::Error),

    /// The search root does not exist or is not a directory.
    #[error("not a directory: {path}")]
    InvalidRoot { path: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Template could not be parsed.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// The promotion rule rejected a template.
    #[error("{0}")]
    Promote(#[from] PromoteError),
}

/// Result type for migration operations.
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<&MigrateError> for OutputErrorCode {
    fn from(err: &MigrateError) -> Self {
        match err {
            MigrateError::InvalidGlob(_)
            | MigrateError::InvalidSelectorPattern(_)
            | MigrateError::InvalidRoot { .. } => OutputErrorCode::InvalidArguments,
            MigrateError::Io(_) => OutputErrorCode::ApplyError,
            MigrateError::Parse(_) | MigrateError::Promote(_) => OutputErrorCode::TemplateError,
        }
    }
}

impl From<MigrateError> for OutputErrorCode {
    fn from(err: MigrateError) -> Self {
        OutputErrorCode::from(&err)
    }
}
