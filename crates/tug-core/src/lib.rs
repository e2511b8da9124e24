//! Core infrastructure for tug-selectors.
//!
//! This crate provides template-agnostic infrastructure:
//! - Byte spans and line/column source positions
//! - Text position conversions
//! - File filter specifications for template discovery
//! - Unified diff rendering for dry runs
//! - Error codes and JSON output types for CLI responses

pub mod diff;
pub mod error;
pub mod filter;
pub mod output;
pub mod span;
pub mod text;
