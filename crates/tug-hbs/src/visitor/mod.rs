// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for template traversal.
//!
//! [`Visitor`] walks a template read-only; [`VisitorMut`] walks it with
//! mutable access so a visitor can rewrite nodes in place. Both share the
//! same macro-generated `visit_*`/`leave_*` method set and the same walk
//! order, implemented by the `walk_*` and `walk_*_mut` functions.

mod dispatch;
mod traits;

pub use dispatch::{
    walk_block, walk_block_mut, walk_comment, walk_comment_mut, walk_expression,
    walk_expression_mut, walk_hash, walk_hash_mut, walk_hash_pair, walk_hash_pair_mut,
    walk_inverse, walk_inverse_mut, walk_literal, walk_literal_mut, walk_modifier,
    walk_modifier_mut, walk_mustache, walk_mustache_mut, walk_param, walk_param_mut, walk_path,
    walk_path_mut, walk_statement, walk_statement_mut, walk_sub_expression,
    walk_sub_expression_mut, walk_template, walk_template_mut, walk_text, walk_text_mut,
};
pub use traits::{VisitResult, Visitor, VisitorMut};
