//! Test-selector detection.
//!
//! A positional argument is a selector candidate when it is a bare path (not
//! a literal or a sub-expression) whose original text matches the selector
//! naming convention. The convention is a [`SelectorPattern`] passed in by
//! the caller.

use std::sync::LazyLock;

use regex::Regex;
use tug_hbs::{Expression, Param};

/// Default selector naming convention.
pub const DEFAULT_SELECTOR_PATTERN: &str = "^data-test-";

static DEFAULT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_SELECTOR_PATTERN).unwrap());

/// Compiled selector naming convention.
#[derive(Debug, Clone)]
pub struct SelectorPattern {
    regex: Regex,
}

impl SelectorPattern {
    /// Compile a selector pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(SelectorPattern {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Check whether `text` follows the naming convention.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Classify a positional argument.
    ///
    /// Returns the selector text when `param` is a path matching the pattern.
    pub fn selector_of<'a>(&self, param: &'a Param) -> Option<&'a str> {
        match &param.value {
            Expression::Path(path) if self.matches(&path.original) => Some(&path.original),
            _ => None,
        }
    }

    pub fn is_selector(&self, param: &Param) -> bool {
        self.selector_of(param).is_some()
    }
}

impl Default for SelectorPattern {
    fn default() -> Self {
        SelectorPattern {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}
