//! Template rewrite operations.

pub mod promote;
