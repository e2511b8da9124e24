// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for template traversal.

use crate::nodes::{
    BlockStatement, CommentStatement, Expression, Hash, HashPair, Inverse, Literal,
    MustacheStatement, Param, PathExpression, Statement, SubExpression, Template, TextNode,
};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// `leave_*` is still called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called.
    Stop,
}

impl Default for VisitResult {
    fn default() -> Self {
        Self::Continue
    }
}

/// Generates `visit_*`/`leave_*` pairs taking shared references.
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &$node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$node_type) {}
            )*
        }
    };
}

/// Generates `visit_*`/`leave_*` pairs taking mutable references.
macro_rules! visitor_mut_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node, which may be edited in place.")]
                #[doc = ""]
                #[doc = "Children are walked after this returns, so edits to them are seen by the walk."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &mut $node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &mut $node_type) {}
            )*
        }
    };
}

/// Read-only template visitor.
///
/// # Traversal Order
///
/// - `visit_*` is called in **pre-order** (before children)
/// - `leave_*` is called in **post-order** (after children)
/// - Children are visited in source order
///
/// A block's children are its opener's callee and arguments, its program,
/// then its inverse. A chained `{{else if}}` is visited as a block.
///
/// # Example
///
/// ```
/// use tug_hbs::{parse, walk_template, MustacheStatement, VisitResult, Visitor};
///
/// struct Counter(usize);
///
/// impl Visitor for Counter {
///     fn visit_mustache(&mut self, _node: &MustacheStatement) -> VisitResult {
///         self.0 += 1;
///         VisitResult::Continue
///     }
/// }
///
/// let template = parse("{{a}}<p>{{b}}</p>").unwrap();
/// let mut counter = Counter(0);
/// walk_template(&mut counter, &template);
/// assert_eq!(counter.0, 2);
/// ```
pub trait Visitor {
    visitor_methods! {
        template: Template,
        statement: Statement,
    }

    visitor_methods! {
        text: TextNode,
        comment: CommentStatement,
        mustache: MustacheStatement,
        /// Element modifiers are mustaches in an open tag: `<div {{on "click" f}}>`.
        modifier: MustacheStatement,
        block: BlockStatement,
        inverse: Inverse,
    }

    visitor_methods! {
        expression: Expression,
        path: PathExpression,
        literal: Literal,
        sub_expression: SubExpression,
        param: Param,
        hash: Hash,
        hash_pair: HashPair,
    }
}

/// Template visitor that may edit nodes in place.
///
/// Same traversal order and control flow as [`Visitor`].
pub trait VisitorMut {
    visitor_mut_methods! {
        template: Template,
        statement: Statement,
    }

    visitor_mut_methods! {
        text: TextNode,
        comment: CommentStatement,
        mustache: MustacheStatement,
        modifier: MustacheStatement,
        block: BlockStatement,
        inverse: Inverse,
    }

    visitor_mut_methods! {
        expression: Expression,
        path: PathExpression,
        literal: Literal,
        sub_expression: SubExpression,
        param: Param,
        hash: Hash,
        hash_pair: HashPair,
    }
}
