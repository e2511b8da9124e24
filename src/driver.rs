//! Batch driver: discover templates and migrate them one by one.
//!
//! Each file goes through read, parse, transform, print, patch-up and write.
//! A failure at any stage is recorded against that file and the run moves on
//! to the next one; only configuration problems abort the whole run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use tug_core::diff::generate_unified_diff;
use tug_core::filter::FileFilterSpec;
use tug_core::output::{FailureInfo, SelectorInfo};
use tug_hbs::{parse, prettify_error, print};

use crate::check::find_selectors;
use crate::error::{MigrateError, MigrateResult};
use crate::files::{collect_templates, default_patterns, display_path};
use crate::ops::promote::{promote_selectors, PromoteOptions, PromotionOutcome};
use crate::patchup::apply_replacements;
use crate::progress::ProgressSink;
use crate::selector::SelectorPattern;

// ============================================================================
// Single documents
// ============================================================================

/// Result of migrating one template's source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// The migrated text. Equal to the input when nothing changed.
    pub output: String,
    /// Whether `output` differs from the input.
    pub changed: bool,
    /// What the promotion rule did to the tree.
    pub outcome: PromotionOutcome,
}

/// Parse, transform, print and patch up one template.
///
/// When the rule changes nothing, the input text is returned untouched
/// rather than reprinted.
pub fn migrate_source(source: &str, options: &PromoteOptions) -> MigrateResult<MigrationResult> {
    let mut template = parse(source)?;
    let outcome = promote_selectors(&mut template, options)?;

    let output = if outcome.changed {
        apply_replacements(&print(&template), &outcome.replacements)
    } else {
        source.to_string()
    };

    Ok(MigrationResult {
        changed: output != source,
        output,
        outcome,
    })
}

// ============================================================================
// Configuration
// ============================================================================

/// Settings for a batch run.
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    /// Search root; patterns and reported paths are relative to it.
    pub cwd: PathBuf,
    /// Glob patterns, `!` prefix for exclusions. Empty means the defaults.
    pub patterns: Vec<String>,
    pub options: PromoteOptions,
    /// Report changes without writing them.
    pub dry_run: bool,
}

impl MigrateConfig {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        MigrateConfig {
            cwd: cwd.into(),
            patterns: Vec::new(),
            options: PromoteOptions::default(),
            dry_run: false,
        }
    }

    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Use a custom selector regular expression.
    pub fn with_selector_pattern(mut self, pattern: &str) -> MigrateResult<Self> {
        self.options.pattern = SelectorPattern::new(pattern)?;
        Ok(self)
    }

    pub fn with_fast_path(mut self, fast_path: bool) -> Self {
        self.options.fast_path = fast_path;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn filter(&self) -> MigrateResult<FileFilterSpec> {
        let patterns = if self.patterns.is_empty() {
            default_patterns()
        } else {
            self.patterns.clone()
        };
        Ok(FileFilterSpec::parse(&patterns)?)
    }

    fn discover(&self, progress: &mut impl ProgressSink) -> MigrateResult<Vec<PathBuf>> {
        if !self.cwd.is_dir() {
            return Err(MigrateError::InvalidRoot {
                path: self.cwd.display().to_string(),
            });
        }
        let filter = self.filter()?;
        progress.step(1, "Looking for templates...");
        let files = collect_templates(&self.cwd, &filter);
        debug!("found {} templates under {}", files.len(), self.cwd.display());
        Ok(files)
    }
}

// ============================================================================
// Reports
// ============================================================================

/// The per-file stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Parse,
    Transform,
    Write,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Read => "read",
            Stage::Parse => "parse",
            Stage::Transform => "transform",
            Stage::Write => "write",
        }
    }

    fn of(err: &MigrateError) -> Stage {
        match err {
            MigrateError::Parse(_) => Stage::Parse,
            MigrateError::Promote(_) => Stage::Transform,
            _ => Stage::Read,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file that could not be migrated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: String,
    pub stage: Stage,
    pub message: String,
}

impl FileFailure {
    pub fn to_info(&self) -> FailureInfo {
        FailureInfo {
            path: self.path.clone(),
            stage: self.stage.to_string(),
            message: self.message.clone(),
        }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not {} file {}: {}", self.stage, self.path, self.message)
    }
}

/// Summary of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub files_scanned: usize,
    /// Files whose content changed, relative to the search root.
    pub changed: Vec<String>,
    pub failures: Vec<FileFailure>,
    /// Unified diffs of the changed files, in the same order as `changed`.
    /// Only filled in on dry runs.
    pub diffs: Vec<String>,
}

/// A positional selector found by [`run_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundSelector {
    pub path: String,
    pub selector: String,
    pub line: u32,
    pub col: u32,
}

impl FoundSelector {
    pub fn to_info(&self) -> SelectorInfo {
        SelectorInfo {
            path: self.path.clone(),
            line: self.line,
            col: self.col,
            selector: self.selector.clone(),
        }
    }
}

impl fmt::Display for FoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{} {}", self.path, self.line, self.col, self.selector)
    }
}

/// Summary of a check run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub files_scanned: usize,
    pub selectors: Vec<FoundSelector>,
    pub failures: Vec<FileFailure>,
}

// ============================================================================
// Batch runs
// ============================================================================

/// Migrate every template matched by `config`.
///
/// # Errors
///
/// Only configuration errors (bad patterns, missing root) are returned.
/// Per-file failures are collected in [`MigrationReport::failures`].
pub fn run_migration(
    config: &MigrateConfig,
    progress: &mut impl ProgressSink,
) -> MigrateResult<MigrationReport> {
    let files = config.discover(progress)?;
    let mut report = MigrationReport {
        files_scanned: files.len(),
        ..MigrationReport::default()
    };

    progress.step(2, &format!("Migrating {} templates...", files.len()));
    progress.start(files.len());

    for rel_path in &files {
        if let Err(failure) = migrate_file(config, rel_path, &mut report) {
            warn!("{}", failure);
            progress.interrupt(&failure.to_string());
            report.failures.push(failure);
        }
        progress.tick();
    }

    progress.finish();
    info!(
        "{} of {} templates changed, {} failed",
        report.changed.len(),
        report.files_scanned,
        report.failures.len()
    );
    Ok(report)
}

fn migrate_file(
    config: &MigrateConfig,
    rel_path: &Path,
    report: &mut MigrationReport,
) -> Result<(), FileFailure> {
    let path = config.cwd.join(rel_path);
    let shown = display_path(rel_path);
    let fail = |stage: Stage, message: String| FileFailure {
        path: shown.clone(),
        stage,
        message,
    };

    let content = fs::read_to_string(&path).map_err(|e| fail(Stage::Read, e.to_string()))?;

    let result = migrate_source(&content, &config.options).map_err(|e| {
        if let MigrateError::Parse(parse_err) = &e {
            debug!("{}", prettify_error(parse_err, &content, &shown));
        }
        fail(Stage::of(&e), e.to_string())
    })?;

    if !result.changed {
        debug!("{} unchanged", shown);
        return Ok(());
    }

    if config.dry_run {
        report
            .diffs
            .push(generate_unified_diff(&shown, &content, &result.output));
    } else {
        fs::write(&path, &result.output).map_err(|e| fail(Stage::Write, e.to_string()))?;
        info!("migrated {}", shown);
    }
    report.changed.push(shown);
    Ok(())
}

/// List positional selectors in every template matched by `config` without
/// changing anything.
pub fn run_check(
    config: &MigrateConfig,
    progress: &mut impl ProgressSink,
) -> MigrateResult<CheckReport> {
    let files = config.discover(progress)?;
    let mut report = CheckReport {
        files_scanned: files.len(),
        ..CheckReport::default()
    };

    progress.step(2, &format!("Checking {} templates...", files.len()));
    progress.start(files.len());

    for rel_path in &files {
        let shown = display_path(rel_path);
        let scanned = fs::read_to_string(config.cwd.join(rel_path))
            .map_err(|e| (Stage::Read, e.to_string()))
            .and_then(|content| parse(&content).map_err(|e| (Stage::Parse, e.to_string())));

        match scanned {
            Ok(template) => {
                let hits = find_selectors(&template, &config.options.pattern);
                report
                    .selectors
                    .extend(hits.into_iter().map(|hit| FoundSelector {
                        path: shown.clone(),
                        selector: hit.selector,
                        line: hit.loc.start.line,
                        col: hit.loc.start.column,
                    }));
            }
            Err((stage, message)) => {
                let failure = FileFailure {
                    path: shown,
                    stage,
                    message,
                };
                warn!("{}", failure);
                progress.interrupt(&failure.to_string());
                report.failures.push(failure);
            }
        }
        progress.tick();
    }

    progress.finish();
    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================
