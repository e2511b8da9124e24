// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement nodes: text, comments, mustaches, element modifiers and blocks.

use tug_core::span::SourceSpan;

use super::expression::{Expression, Hash, Param};
use super::traits::{Arguments, Codegen, CodegenState};

/// A parsed template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub body: Vec<Statement>,
    pub loc: SourceSpan,
}

impl Codegen for Template {
    fn codegen(&self, state: &mut CodegenState) {
        self.body.codegen(state);
    }
}

/// A top-level or block-body statement.
///
/// `Mustache` and `Block` are the invocation-style nodes; everything else is
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Text(TextNode),
    Comment(CommentStatement),
    /// `{{path params hash}}`, including attribute values.
    Mustache(MustacheStatement),
    /// A mustache in element-modifier position: `<div {{on "click" f}}>`.
    Modifier(MustacheStatement),
    Block(BlockStatement),
}

/// Which invocation shape a statement has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Invocation,
    BlockInvocation,
    Other,
}

impl Statement {
    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Mustache(_) => NodeKind::Invocation,
            Statement::Block(_) => NodeKind::BlockInvocation,
            _ => NodeKind::Other,
        }
    }

    pub fn loc(&self) -> SourceSpan {
        match self {
            Statement::Text(t) => t.loc,
            Statement::Comment(c) => c.loc,
            Statement::Mustache(m) | Statement::Modifier(m) => m.tag.loc,
            Statement::Block(b) => b.loc,
        }
    }
}

impl Codegen for Statement {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Statement::Text(t) => t.codegen(state),
            Statement::Comment(c) => c.codegen(state),
            Statement::Mustache(m) | Statement::Modifier(m) => m.codegen(state),
            Statement::Block(b) => b.codegen(state),
        }
    }
}

/// Raw template text, HTML markup included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub chars: String,
    pub loc: SourceSpan,
}

impl Codegen for TextNode {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.chars);
    }
}

/// `{{! ... }}` or `{{!-- ... --}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStatement {
    /// The full comment including delimiters.
    pub raw: String,
    /// The comment body without delimiters.
    pub value: String,
    pub loc: SourceSpan,
}

impl Codegen for CommentStatement {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.raw);
    }
}

/// The `{{ ... }}` head shared by mustaches, block openers and chained
/// `{{else if ...}}` openers.
///
/// A tag parsed from source remembers its original text and prints it
/// verbatim until [`Tag::mark_dirty`] is called; a dirty tag is regenerated
/// from its parts. Editing `params` or `hash` without marking the tag dirty
/// leaves the printed output unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// `{{`, `{{{`, `{{~`, `{{#`, `{{~#`, `{{else`, ...
    pub opener: String,
    /// Whitespace between the opener and the callee path.
    pub leading: String,
    pub path: Expression,
    pub params: Vec<Param>,
    pub hash: Option<Hash>,
    /// ` as |a b|`, including its leading whitespace.
    pub block_params: Option<String>,
    /// Whitespace before the closer.
    pub trailing: String,
    /// `}}`, `}}}`, `~}}`, ...
    pub closer: String,
    pub loc: SourceSpan,
    original: Option<String>,
}

impl Tag {
    /// Build a tag from its parts. The tag starts dirty.
    pub fn new(opener: impl Into<String>, path: Expression, closer: impl Into<String>) -> Self {
        Tag {
            opener: opener.into(),
            leading: String::new(),
            path,
            params: Vec::new(),
            hash: Some(Hash::default()),
            block_params: None,
            trailing: String::new(),
            closer: closer.into(),
            loc: SourceSpan::default(),
            original: None,
        }
    }

    /// Attach the source text this tag was parsed from.
    pub(crate) fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original = Some(original.into());
        self
    }

    pub fn mark_dirty(&mut self) {
        self.original = None;
    }

    pub fn is_dirty(&self) -> bool {
        self.original.is_none()
    }

    /// The text this tag was parsed from, while it is untouched.
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    /// The callee path text (`if`, `my-component`, `this.helper`).
    pub fn name(&self) -> String {
        self.path.source_text()
    }
}

impl Codegen for Tag {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(original) = &self.original {
            state.add_token(original);
            return;
        }
        state.add_token(&self.opener);
        state.add_token(&self.leading);
        self.path.codegen(state);
        self.params.codegen(state);
        self.hash.codegen(state);
        if let Some(block_params) = &self.block_params {
            state.add_token(block_params);
        }
        state.add_token(&self.trailing);
        state.add_token(&self.closer);
    }
}

/// `{{path params hash}}` or `{{{path params hash}}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MustacheStatement {
    pub tag: Tag,
    /// Triple-stash (unescaped) output.
    pub trusting: bool,
}

impl Arguments for MustacheStatement {
    fn tag(&self) -> &Tag {
        &self.tag
    }

    fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }
}

impl Codegen for MustacheStatement {
    fn codegen(&self, state: &mut CodegenState) {
        self.tag.codegen(state);
    }
}

/// `{{#path ...}} program {{else}} inverse {{/path}}`.
///
/// A block reached through `{{else if ...}}` is itself a `BlockStatement`
/// whose `open.opener` starts with `{{else` and which has no `close` of its
/// own: it shares the close tag of the outermost block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStatement {
    pub open: Tag,
    pub program: Vec<Statement>,
    pub inverse: Option<Inverse>,
    pub close: Option<CloseTag>,
    pub loc: SourceSpan,
}

impl BlockStatement {
    pub fn is_chained(&self) -> bool {
        self.close.is_none()
    }
}

impl Arguments for BlockStatement {
    fn tag(&self) -> &Tag {
        &self.open
    }

    fn tag_mut(&mut self) -> &mut Tag {
        &mut self.open
    }
}

impl Codegen for BlockStatement {
    fn codegen(&self, state: &mut CodegenState) {
        self.open.codegen(state);
        self.program.codegen(state);
        self.inverse.codegen(state);
        self.close.codegen(state);
    }
}

/// The `{{else}}` half of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inverse {
    /// `{{else}}` or `{{^}}` followed by a body.
    Else { tag: ElseTag, body: Vec<Statement> },
    /// `{{else if cond}}`: a nested block sharing the parent's close tag.
    Chained(Box<BlockStatement>),
}

impl Codegen for Inverse {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Inverse::Else { tag, body } => {
                tag.codegen(state);
                body.codegen(state);
            }
            Inverse::Chained(block) => block.codegen(state),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElseTag {
    pub raw: String,
    pub loc: SourceSpan,
}

impl Codegen for ElseTag {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.raw);
    }
}

/// `{{/path}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseTag {
    pub raw: String,
    /// The closed path, e.g. `if`.
    pub path: String,
    pub loc: SourceSpan,
}

impl Codegen for CloseTag {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{HashPair, Literal, PathExpression};

    fn widget_tag() -> Tag {
        Tag::new(
            "{{",
            Expression::Path(PathExpression::new("widget")),
            "}}",
        )
    }

    #[test]
    fn new_tag_is_dirty_and_regenerates() {
        let mut tag = widget_tag();
        tag.params
            .push(Param::new(Expression::Path(PathExpression::new("foo"))));
        assert!(tag.is_dirty());
        let mut state = CodegenState::default();
        tag.codegen(&mut state);
        assert_eq!(state.to_string(), "{{widget foo}}");
    }

    #[test]
    fn clean_tag_prints_original() {
        let mut tag = widget_tag().with_original("{{  widget   }}");
        tag.params
            .push(Param::new(Expression::Path(PathExpression::new("ignored"))));
        let mut state = CodegenState::default();
        tag.codegen(&mut state);
        assert_eq!(state.to_string(), "{{  widget   }}");

        tag.mark_dirty();
        let mut state = CodegenState::default();
        tag.codegen(&mut state);
        assert_eq!(state.to_string(), "{{widget ignored}}");
    }

    #[test]
    fn arguments_trait_edits_without_dirtying() {
        let mut mustache = MustacheStatement {
            tag: widget_tag().with_original("{{widget a}}"),
            trusting: false,
        };
        mustache.replace_params(vec![Param::new(Expression::Path(PathExpression::new(
            "b",
        )))]);
        mustache
            .hash_mut()
            .unwrap()
            .pairs
            .push(HashPair::new("x", Expression::Literal(Literal::boolean(true))));
        assert!(!mustache.tag.is_dirty());
        assert_eq!(mustache.params().len(), 1);

        mustache.mark_dirty();
        let mut state = CodegenState::default();
        mustache.codegen(&mut state);
        assert_eq!(state.to_string(), "{{widget b x=true}}");
    }

    #[test]
    fn statement_kinds() {
        let mustache = MustacheStatement {
            tag: widget_tag(),
            trusting: false,
        };
        assert_eq!(
            Statement::Mustache(mustache.clone()).kind(),
            NodeKind::Invocation
        );
        assert_eq!(Statement::Modifier(mustache).kind(), NodeKind::Other);
        let text = Statement::Text(TextNode {
            chars: "hi".into(),
            loc: SourceSpan::default(),
        });
        assert_eq!(text.kind(), NodeKind::Other);
    }
}
