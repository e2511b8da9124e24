// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for template traversal.
//!
//! - **Pre-order**: `visit_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Source order**: Children are visited left-to-right, top-to-bottom
//!
//! `VisitResult::Stop` halts the walk immediately; no `leave_*` is called
//! for the node that stopped or any of its ancestors.

use super::traits::{VisitResult, Visitor, VisitorMut};
use crate::nodes::{
    BlockStatement, CommentStatement, Expression, Hash, HashPair, Inverse, Literal,
    MustacheStatement, Param, PathExpression, Statement, SubExpression, Tag, Template, TextNode,
};

/// Runs `$children` unless the visit result says otherwise, then `leave`.
macro_rules! walk_node {
    ($visitor:ident, $node:ident, $visit:ident, $leave:ident, $children:block) => {{
        match $visitor.$visit($node) {
            VisitResult::Stop => return VisitResult::Stop,
            VisitResult::SkipChildren => {}
            VisitResult::Continue => {
                let children: VisitResult = $children;
                if children == VisitResult::Stop {
                    return VisitResult::Stop;
                }
            }
        }
        $visitor.$leave($node);
        VisitResult::Continue
    }};
}

/// Stop-propagating sequence: evaluates each walk in order.
macro_rules! walk_all {
    ($($walk:expr),* $(,)?) => {{
        let mut result = VisitResult::Continue;
        $(
            if result != VisitResult::Stop {
                result = $walk;
            }
        )*
        result
    }};
}

// ============================================================================
// Read-only walks
// ============================================================================

/// Walk a [`Template`].
pub fn walk_template<V: Visitor>(visitor: &mut V, node: &Template) -> VisitResult {
    walk_node!(visitor, node, visit_template, leave_template, {
        walk_statements(visitor, &node.body)
    })
}

fn walk_statements<V: Visitor>(visitor: &mut V, body: &[Statement]) -> VisitResult {
    for statement in body {
        if walk_statement(visitor, statement) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Walk a [`Statement`], dispatching on its variant.
pub fn walk_statement<V: Visitor>(visitor: &mut V, node: &Statement) -> VisitResult {
    walk_node!(visitor, node, visit_statement, leave_statement, {
        match node {
            Statement::Text(text) => walk_text(visitor, text),
            Statement::Comment(comment) => walk_comment(visitor, comment),
            Statement::Mustache(mustache) => walk_mustache(visitor, mustache),
            Statement::Modifier(modifier) => walk_modifier(visitor, modifier),
            Statement::Block(block) => walk_block(visitor, block),
        }
    })
}

pub fn walk_text<V: Visitor>(visitor: &mut V, node: &TextNode) -> VisitResult {
    walk_node!(visitor, node, visit_text, leave_text, { VisitResult::Continue })
}

pub fn walk_comment<V: Visitor>(visitor: &mut V, node: &CommentStatement) -> VisitResult {
    walk_node!(visitor, node, visit_comment, leave_comment, {
        VisitResult::Continue
    })
}

/// Walk a [`MustacheStatement`]: callee, params, hash.
pub fn walk_mustache<V: Visitor>(visitor: &mut V, node: &MustacheStatement) -> VisitResult {
    walk_node!(visitor, node, visit_mustache, leave_mustache, {
        walk_tag(visitor, &node.tag)
    })
}

/// Walk an element modifier.
pub fn walk_modifier<V: Visitor>(visitor: &mut V, node: &MustacheStatement) -> VisitResult {
    walk_node!(visitor, node, visit_modifier, leave_modifier, {
        walk_tag(visitor, &node.tag)
    })
}

/// Walk a [`BlockStatement`]: opener arguments, program, inverse.
pub fn walk_block<V: Visitor>(visitor: &mut V, node: &BlockStatement) -> VisitResult {
    walk_node!(visitor, node, visit_block, leave_block, {
        walk_all!(
            walk_tag(visitor, &node.open),
            walk_statements(visitor, &node.program),
            match &node.inverse {
                Some(inverse) => walk_inverse(visitor, inverse),
                None => VisitResult::Continue,
            },
        )
    })
}

/// Walk an [`Inverse`]: an `{{else}}` body or a chained block.
pub fn walk_inverse<V: Visitor>(visitor: &mut V, node: &Inverse) -> VisitResult {
    walk_node!(visitor, node, visit_inverse, leave_inverse, {
        match node {
            Inverse::Else { body, .. } => walk_statements(visitor, body),
            Inverse::Chained(block) => walk_block(visitor, block),
        }
    })
}

fn walk_tag<V: Visitor>(visitor: &mut V, tag: &Tag) -> VisitResult {
    walk_all!(
        walk_expression(visitor, &tag.path),
        walk_params(visitor, &tag.params),
        match &tag.hash {
            Some(hash) => walk_hash(visitor, hash),
            None => VisitResult::Continue,
        },
    )
}

fn walk_params<V: Visitor>(visitor: &mut V, params: &[Param]) -> VisitResult {
    for param in params {
        if walk_param(visitor, param) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

/// Walk an [`Expression`], dispatching on its variant.
pub fn walk_expression<V: Visitor>(visitor: &mut V, node: &Expression) -> VisitResult {
    walk_node!(visitor, node, visit_expression, leave_expression, {
        match node {
            Expression::Path(path) => walk_path(visitor, path),
            Expression::Literal(literal) => walk_literal(visitor, literal),
            Expression::SubExpression(sub) => walk_sub_expression(visitor, sub),
        }
    })
}

pub fn walk_path<V: Visitor>(visitor: &mut V, node: &PathExpression) -> VisitResult {
    walk_node!(visitor, node, visit_path, leave_path, { VisitResult::Continue })
}

pub fn walk_literal<V: Visitor>(visitor: &mut V, node: &Literal) -> VisitResult {
    walk_node!(visitor, node, visit_literal, leave_literal, {
        VisitResult::Continue
    })
}

pub fn walk_sub_expression<V: Visitor>(visitor: &mut V, node: &SubExpression) -> VisitResult {
    walk_node!(visitor, node, visit_sub_expression, leave_sub_expression, {
        walk_all!(
            walk_expression(visitor, &node.path),
            walk_params(visitor, &node.params),
            walk_hash(visitor, &node.hash),
        )
    })
}

pub fn walk_param<V: Visitor>(visitor: &mut V, node: &Param) -> VisitResult {
    walk_node!(visitor, node, visit_param, leave_param, {
        walk_expression(visitor, &node.value)
    })
}

pub fn walk_hash<V: Visitor>(visitor: &mut V, node: &Hash) -> VisitResult {
    walk_node!(visitor, node, visit_hash, leave_hash, {
        let mut result = VisitResult::Continue;
        for pair in &node.pairs {
            if walk_hash_pair(visitor, pair) == VisitResult::Stop {
                result = VisitResult::Stop;
                break;
            }
        }
        result
    })
}

pub fn walk_hash_pair<V: Visitor>(visitor: &mut V, node: &HashPair) -> VisitResult {
    walk_node!(visitor, node, visit_hash_pair, leave_hash_pair, {
        walk_expression(visitor, &node.value)
    })
}

// ============================================================================
// Mutable walks
// ============================================================================

/// Walk a [`Template`], allowing the visitor to edit nodes in place.
pub fn walk_template_mut<V: VisitorMut>(visitor: &mut V, node: &mut Template) -> VisitResult {
    walk_node!(visitor, node, visit_template, leave_template, {
        walk_statements_mut(visitor, &mut node.body)
    })
}

fn walk_statements_mut<V: VisitorMut>(visitor: &mut V, body: &mut [Statement]) -> VisitResult {
    for statement in body {
        if walk_statement_mut(visitor, statement) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

pub fn walk_statement_mut<V: VisitorMut>(visitor: &mut V, node: &mut Statement) -> VisitResult {
    walk_node!(visitor, node, visit_statement, leave_statement, {
        match node {
            Statement::Text(text) => walk_text_mut(visitor, text),
            Statement::Comment(comment) => walk_comment_mut(visitor, comment),
            Statement::Mustache(mustache) => walk_mustache_mut(visitor, mustache),
            Statement::Modifier(modifier) => walk_modifier_mut(visitor, modifier),
            Statement::Block(block) => walk_block_mut(visitor, block),
        }
    })
}

pub fn walk_text_mut<V: VisitorMut>(visitor: &mut V, node: &mut TextNode) -> VisitResult {
    walk_node!(visitor, node, visit_text, leave_text, { VisitResult::Continue })
}

pub fn walk_comment_mut<V: VisitorMut>(
    visitor: &mut V,
    node: &mut CommentStatement,
) -> VisitResult {
    walk_node!(visitor, node, visit_comment, leave_comment, {
        VisitResult::Continue
    })
}

pub fn walk_mustache_mut<V: VisitorMut>(
    visitor: &mut V,
    node: &mut MustacheStatement,
) -> VisitResult {
    walk_node!(visitor, node, visit_mustache, leave_mustache, {
        walk_tag_mut(visitor, &mut node.tag)
    })
}

pub fn walk_modifier_mut<V: VisitorMut>(
    visitor: &mut V,
    node: &mut MustacheStatement,
) -> VisitResult {
    walk_node!(visitor, node, visit_modifier, leave_modifier, {
        walk_tag_mut(visitor, &mut node.tag)
    })
}

pub fn walk_block_mut<V: VisitorMut>(visitor: &mut V, node: &mut BlockStatement) -> VisitResult {
    walk_node!(visitor, node, visit_block, leave_block, {
        walk_all!(
            walk_tag_mut(visitor, &mut node.open),
            walk_statements_mut(visitor, &mut node.program),
            match &mut node.inverse {
                Some(inverse) => walk_inverse_mut(visitor, inverse),
                None => VisitResult::Continue,
            },
        )
    })
}

pub fn walk_inverse_mut<V: VisitorMut>(visitor: &mut V, node: &mut Inverse) -> VisitResult {
    walk_node!(visitor, node, visit_inverse, leave_inverse, {
        match node {
            Inverse::Else { body, .. } => walk_statements_mut(visitor, body),
            Inverse::Chained(block) => walk_block_mut(visitor, block),
        }
    })
}

fn walk_tag_mut<V: VisitorMut>(visitor: &mut V, tag: &mut Tag) -> VisitResult {
    walk_all!(
        walk_expression_mut(visitor, &mut tag.path),
        walk_params_mut(visitor, &mut tag.params),
        match &mut tag.hash {
            Some(hash) => walk_hash_mut(visitor, hash),
            None => VisitResult::Continue,
        },
    )
}

fn walk_params_mut<V: VisitorMut>(visitor: &mut V, params: &mut [Param]) -> VisitResult {
    for param in params {
        if walk_param_mut(visitor, param) == VisitResult::Stop {
            return VisitResult::Stop;
        }
    }
    VisitResult::Continue
}

pub fn walk_expression_mut<V: VisitorMut>(visitor: &mut V, node: &mut Expression) -> VisitResult {
    walk_node!(visitor, node, visit_expression, leave_expression, {
        match node {
            Expression::Path(path) => walk_path_mut(visitor, path),
            Expression::Literal(literal) => walk_literal_mut(visitor, literal),
            Expression::SubExpression(sub) => walk_sub_expression_mut(visitor, sub),
        }
    })
}

pub fn walk_path_mut<V: VisitorMut>(visitor: &mut V, node: &mut PathExpression) -> VisitResult {
    walk_node!(visitor, node, visit_path, leave_path, { VisitResult::Continue })
}

pub fn walk_literal_mut<V: VisitorMut>(visitor: &mut V, node: &mut Literal) -> VisitResult {
    walk_node!(visitor, node, visit_literal, leave_literal, {
        VisitResult::Continue
    })
}

pub fn walk_sub_expression_mut<V: VisitorMut>(
    visitor: &mut V,
    node: &mut SubExpression,
) -> VisitResult {
    walk_node!(visitor, node, visit_sub_expression, leave_sub_expression, {
        walk_all!(
            walk_expression_mut(visitor, &mut node.path),
            walk_params_mut(visitor, &mut node.params),
            walk_hash_mut(visitor, &mut node.hash),
        )
    })
}

pub fn walk_param_mut<V: VisitorMut>(visitor: &mut V, node: &mut Param) -> VisitResult {
    walk_node!(visitor, node, visit_param, leave_param, {
        walk_expression_mut(visitor, &mut node.value)
    })
}

pub fn walk_hash_mut<V: VisitorMut>(visitor: &mut V, node: &mut Hash) -> VisitResult {
    walk_node!(visitor, node, visit_hash, leave_hash, {
        let mut result = VisitResult::Continue;
        for pair in &mut node.pairs {
            if walk_hash_pair_mut(visitor, pair) == VisitResult::Stop {
                result = VisitResult::Stop;
                break;
            }
        }
        result
    })
}

pub fn walk_hash_pair_mut<V: VisitorMut>(visitor: &mut V, node: &mut HashPair) -> VisitResult {
    walk_node!(visitor, node, visit_hash_pair, leave_hash_pair, {
        walk_expression_mut(visitor, &mut node.value)
    })
}
