// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

mod expression;
mod statement;
mod traits;

pub use expression::{
    Expression, ExpressionKind, Hash, HashPair, Literal, LiteralKind, Param, PathExpression,
    SubExpression,
};
pub use statement::{
    BlockStatement, CloseTag, CommentStatement, ElseTag, Inverse, MustacheStatement, NodeKind,
    Statement, Tag, Template, TextNode,
};
pub use traits::{Arguments, Codegen, CodegenState};
