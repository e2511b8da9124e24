//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Core Infrastructure Types
// ============================================================================

use tug_selectors::diff::generate_unified_diff;
use tug_selectors::output::{
    emit_response, CheckResponse, ErrorResponse, FailureInfo, MigrateResponse, SelectorInfo,
    SCHEMA_VERSION,
};
use tug_selectors::span::{Position, SourceSpan, Span};

// ============================================================================
// Rewrite
// ============================================================================

use tug_selectors::ops::promote::{
    promote_node, promote_selectors, NodeChange, PromoteError, PromoteOptions, PromotionOutcome,
    Replacement,
};
use tug_selectors::patchup::apply_replacements;
use tug_selectors::selector::{SelectorPattern, DEFAULT_SELECTOR_PATTERN};

// ============================================================================
// Driver
// ============================================================================

use tug_selectors::check::{find_selectors, SelectorHit};
use tug_selectors::driver::{
    migrate_source, run_check, run_migration, CheckReport, FileFailure, FoundSelector,
    MigrateConfig, MigrationReport, MigrationResult, Stage,
};
use tug_selectors::error::{MigrateError, MigrateResult};
use tug_selectors::files::{collect_templates, default_patterns, display_path, DEFAULT_PATTERNS};
use tug_selectors::progress::{BarProgress, NoProgress, ProgressSink, NUM_STEPS};

// ============================================================================
// Parser crate
// ============================================================================

use tug_hbs::{
    parse, prettify_error, print, walk_template, walk_template_mut, Arguments, BlockStatement,
    Hash, HashPair, MustacheStatement, Param, ParseError, Statement, Template, VisitResult,
    Visitor, VisitorMut,
};

#[test]
fn api_surface_compiles() {
    // If this compiles, the public API is intact
}
