//! File filter specification for template discovery.
//!
//! Patterns come from the command line and follow gitignore-style rules:
//!
//! - Patterns without `!` prefix are inclusions
//! - Patterns with `!` prefix are exclusions
//! - Standard glob syntax: `*`, `**`, `?`, `[abc]`
//!
//! A path matches when it matches at least one inclusion and no exclusion.
//! Default exclusions always apply: `.git` and `node_modules` at any depth,
//! and the project-level `tmp`, `dist` and `bower_components` directories.
//! A `tmp` directory nested inside `app/` is ordinary source.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;

/// Default directory exclusions that always apply.
///
/// Build output is only excluded at the search root.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "**/.git/**",
    "**/node_modules/**",
    "bower_components/**",
    "tmp/**",
    "dist/**",
];

/// Error type for file filter operations.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Invalid glob pattern syntax.
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Only exclusions were given, so nothing could ever match.
    #[error("no inclusion patterns given")]
    NoInclusions,
}

/// Parsed file filter specification.
#[derive(Debug)]
pub struct FileFilterSpec {
    inclusions: GlobSet,
    exclusions: GlobSet,
    default_exclusions: GlobSet,
    inclusion_patterns: Vec<String>,
}

impl FileFilterSpec {
    /// Parse filter patterns.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use tug_core::filter::FileFilterSpec;
    ///
    /// let spec = FileFilterSpec::parse(&[
    ///     "app/**/*.hbs".to_string(),
    ///     "!app/legacy/**".to_string(),
    /// ])
    /// .unwrap();
    /// assert!(spec.matches(Path::new("app/templates/index.hbs")));
    /// assert!(!spec.matches(Path::new("app/legacy/old.hbs")));
    /// ```
    pub fn parse(args: &[String]) -> Result<Self, FilterError> {
        let mut inclusion_patterns = Vec::new();
        let mut exclusion_patterns = Vec::new();

        for arg in args {
            if let Some(pattern) = arg.strip_prefix('!') {
                exclusion_patterns.push(pattern.to_string());
            } else {
                inclusion_patterns.push(arg.clone());
            }
        }

        if inclusion_patterns.is_empty() {
            return Err(FilterError::NoInclusions);
        }

        let inclusions = build_glob_set(&inclusion_patterns)?;
        let exclusions = build_glob_set(&exclusion_patterns)?;
        let default_exclusions = build_glob_set(
            &DEFAULT_EXCLUSIONS
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        )?;

        Ok(FileFilterSpec {
            inclusions,
            exclusions,
            default_exclusions,
            inclusion_patterns,
        })
    }

    /// Check if a path (relative to the search root) matches the filter.
    pub fn matches(&self, path: &Path) -> bool {
        if self.default_exclusions.is_match(path) {
            return false;
        }
        if self.exclusions.is_match(path) {
            return false;
        }
        self.inclusions.is_match(path)
    }

    /// Check if a directory (relative to the search root) can be skipped
    /// entirely during a walk.
    pub fn excludes_dir(&self, dir: &Path) -> bool {
        // Probe a child path so `**/name/**` patterns match the directory itself.
        let probe = dir.join("_");
        self.default_exclusions.is_match(&probe) || self.exclusions.is_match(&probe)
    }

    /// The inclusion patterns, in the order given.
    pub fn inclusion_patterns(&self) -> &[String] {
        &self.inclusion_patterns
    }

    /// Check if this filter has any user exclusion patterns.
    pub fn has_exclusions(&self) -> bool {
        !self.exclusions.is_empty()
    }
}

/// Build a GlobSet from a list of pattern strings.
fn build_glob_set(patterns: &[String]) -> Result<GlobSet, FilterError> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| FilterError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }

    builder.build().map_err(|e| FilterError::InvalidPattern {
        pattern: "<combined>".to_string(),
        message: e.to_string(),
    })
}
