//! Error code constants for tug-selectors.
//!
//! ## Exit Code Mapping
//!
//! - `1`: Check found positional selectors (not a failure of the tool itself)
//! - `2`: Invalid arguments (bad glob, bad selector pattern, bad cwd)
//! - `3`: Template errors (a template could not be parsed or transformed)
//! - `4`: Apply errors (one or more files could not be read or written)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! Domain errors live next to the code that raises them; the binary maps
//! each of them onto an [`OutputErrorCode`].

use std::fmt;

use serde::{Serialize, Serializer};

/// Error codes for JSON output and process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// `check` found selectors that still need migrating.
    SelectorsFound = 1,
    /// Invalid arguments from caller (bad input, malformed pattern).
    InvalidArguments = 2,
    /// A template failed to parse or transform.
    TemplateError = 3,
    /// Failed to read or write one or more files.
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Stable string name used in JSON error payloads.
    pub fn name(&self) -> &'static str {
        match self {
            OutputErrorCode::SelectorsFound => "SelectorsFound",
            OutputErrorCode::InvalidArguments => "InvalidArguments",
            OutputErrorCode::TemplateError => "TemplateError",
            OutputErrorCode::ApplyError => "ApplyError",
            OutputErrorCode::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for OutputErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
