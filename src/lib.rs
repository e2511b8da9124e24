//! tug-selectors: promote positional test selectors in Handlebars templates.
//!
//! Ember templates used to attach test selectors as bare positional
//! arguments: `{{widget data-test-widget}}`. This crate rewrites them into
//! keyword arguments, `{{widget data-test-widget=true}}`, keeping every
//! other byte of the template as written.
//!
//! ```
//! use tug_selectors::{migrate_source, PromoteOptions};
//!
//! let result = migrate_source("{{widget data-test-widget}}", &PromoteOptions::default()).unwrap();
//! assert_eq!(result.output, "{{widget data-test-widget=true}}");
//! ```

// Core infrastructure - re-exported from the workspace crates
pub use tug_core::diff;
pub use tug_core::output;
pub use tug_core::span;

// The rewrite
pub mod ops;
pub mod patchup;
pub mod selector;

// Read-only scan
pub mod check;

// Batch driver
pub mod driver;
pub mod error;
pub mod files;
pub mod progress;

pub use driver::{
    migrate_source, run_check, run_migration, CheckReport, FileFailure, MigrateConfig,
    MigrationReport, MigrationResult, Stage,
};
pub use error::{MigrateError, MigrateResult};
pub use ops::promote::{
    promote_node, promote_selectors, PromoteError, PromoteOptions, PromotionOutcome, Replacement,
};
pub use patchup::apply_replacements;
pub use progress::{BarProgress, NoProgress, ProgressSink};
pub use selector::SelectorPattern;
