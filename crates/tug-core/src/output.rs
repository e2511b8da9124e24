//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as its first field
//! 2. **Deterministic:** Same input -> same output (field order, array ordering)
//! 3. **Versioned:** Schema version in every response

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::OutputErrorCode;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// A file that could not be processed, and the stage that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Path relative to the search root.
    pub path: String,
    /// One of: read, parse, transform, write.
    pub stage: String,
    /// Human-readable error message.
    pub message: String,
}

/// Response for `migrate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateResponse {
    pub status: String,
    pub schema_version: String,
    /// True when no files were written.
    pub dry_run: bool,
    /// Number of templates discovered.
    pub files_scanned: usize,
    /// Templates whose content changed (written unless dry run).
    pub files_changed: Vec<String>,
    /// Templates that failed at some stage.
    pub failures: Vec<FailureInfo>,
}

impl MigrateResponse {
    pub fn new(
        dry_run: bool,
        files_scanned: usize,
        files_changed: Vec<String>,
        failures: Vec<FailureInfo>,
    ) -> Self {
        let status = if failures.is_empty() { "ok" } else { "partial" };
        MigrateResponse {
            status: status.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            dry_run,
            files_scanned,
            files_changed,
            failures,
        }
    }
}

/// One positional selector found by `check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorInfo {
    pub path: String,
    pub line: u32,
    pub col: u32,
    pub selector: String,
}

/// Response for `check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: String,
    pub schema_version: String,
    pub files_scanned: usize,
    pub selectors: Vec<SelectorInfo>,
    pub failures: Vec<FailureInfo>,
}

impl CheckResponse {
    pub fn new(
        files_scanned: usize,
        selectors: Vec<SelectorInfo>,
        failures: Vec<FailureInfo>,
    ) -> Self {
        let status = if selectors.is_empty() && failures.is_empty() {
            "ok"
        } else {
            "found"
        };
        CheckResponse {
            status: status.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            files_scanned,
            selectors,
            failures,
        }
    }
}

/// Error details.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: OutputErrorCode,
    pub message: String,
}

/// Response for any command that failed before producing a result.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn new(code: OutputErrorCode, message: impl Into<String>) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo {
                code,
                message: message.into(),
            },
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
