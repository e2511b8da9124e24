// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes: paths, literals, sub-expressions and argument lists.

use tug_core::span::SourceSpan;

use super::traits::{Codegen, CodegenState};

/// An expression appearing as a callee, positional argument or hash value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Path(PathExpression),
    Literal(Literal),
    SubExpression(Box<SubExpression>),
}

/// Coarse classification of an [`Expression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    Path,
    Literal,
    SubExpression,
}

impl Expression {
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Path(_) => ExpressionKind::Path,
            Expression::Literal(_) => ExpressionKind::Literal,
            Expression::SubExpression(_) => ExpressionKind::SubExpression,
        }
    }

    pub fn loc(&self) -> SourceSpan {
        match self {
            Expression::Path(p) => p.loc,
            Expression::Literal(l) => l.loc,
            Expression::SubExpression(s) => s.loc,
        }
    }

    pub fn as_path(&self) -> Option<&PathExpression> {
        match self {
            Expression::Path(p) => Some(p),
            _ => None,
        }
    }

    /// The expression's source text as it will be printed.
    pub fn source_text(&self) -> String {
        let mut state = CodegenState::default();
        self.codegen(&mut state);
        state.to_string()
    }
}

impl Codegen for Expression {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Expression::Path(p) => p.codegen(state),
            Expression::Literal(l) => l.codegen(state),
            Expression::SubExpression(s) => s.codegen(state),
        }
    }
}

/// A path such as `foo`, `this.foo`, `@arg.bar`, `../x` or `data-test-foo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    /// The path exactly as written.
    pub original: String,
    pub loc: SourceSpan,
}

impl PathExpression {
    pub fn new(original: impl Into<String>) -> Self {
        PathExpression {
            original: original.into(),
            loc: SourceSpan::default(),
        }
    }

    /// `@name` argument paths.
    pub fn is_data(&self) -> bool {
        self.original.starts_with('@')
    }

    /// Paths rooted at `this`.
    pub fn is_this(&self) -> bool {
        self.original == "this"
            || self.original.starts_with("this.")
            || self.original.starts_with("this/")
    }

    /// The first segment, without any `@` prefix.
    pub fn head(&self) -> &str {
        let path = self.original.trim_start_matches('@');
        path.split(['.', '/']).next().unwrap_or(path)
    }
}

impl Codegen for PathExpression {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.original);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
}

/// A literal value. `raw` keeps quotes and escapes exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub raw: String,
    pub loc: SourceSpan,
}

impl Literal {
    /// Build a boolean literal.
    pub fn boolean(value: bool) -> Self {
        Literal {
            kind: LiteralKind::Boolean,
            raw: if value { "true" } else { "false" }.to_string(),
            loc: SourceSpan::default(),
        }
    }

    /// Build a double-quoted string literal.
    pub fn string(value: &str) -> Self {
        Literal {
            kind: LiteralKind::String,
            raw: format!("\"{}\"", value.replace('"', "\\\"")),
            loc: SourceSpan::default(),
        }
    }

    /// The unquoted value of a string literal.
    pub fn string_value(&self) -> Option<String> {
        if self.kind != LiteralKind::String || self.raw.len() < 2 {
            return None;
        }
        let quote = self.raw.chars().next()?;
        let inner = &self.raw[1..self.raw.len() - 1];
        Some(inner.replace(&format!("\\{}", quote), &quote.to_string()))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match (self.kind, self.raw.as_str()) {
            (LiteralKind::Boolean, "true") => Some(true),
            (LiteralKind::Boolean, "false") => Some(false),
            _ => None,
        }
    }
}

impl Codegen for Literal {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.raw);
    }
}

/// A parenthesised helper call: `(concat "a" b sep="-")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubExpression {
    /// Whitespace after `(`.
    pub leading: String,
    pub path: Expression,
    pub params: Vec<Param>,
    pub hash: Hash,
    /// Whitespace before `)`.
    pub trailing: String,
    pub loc: SourceSpan,
}

impl Codegen for SubExpression {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("(");
        state.add_token(&self.leading);
        self.path.codegen(state);
        for param in &self.params {
            param.codegen(state);
        }
        self.hash.codegen(state);
        state.add_token(&self.trailing);
        state.add_token(")");
    }
}

/// A positional argument together with the whitespace that precedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub leading: String,
    pub value: Expression,
}

impl Param {
    pub fn new(value: Expression) -> Self {
        Param {
            leading: " ".to_string(),
            value,
        }
    }

    pub fn loc(&self) -> SourceSpan {
        self.value.loc()
    }
}

impl Codegen for Param {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.leading);
        self.value.codegen(state);
    }
}

/// The keyword-argument list of an invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hash {
    pub pairs: Vec<HashPair>,
    /// From the first pair to the last; a point after the positional
    /// arguments when there are no pairs.
    pub loc: SourceSpan,
}

impl Hash {
    pub fn get(&self, key: &str) -> Option<&HashPair> {
        self.pairs.iter().find(|pair| pair.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Codegen for Hash {
    fn codegen(&self, state: &mut CodegenState) {
        for pair in &self.pairs {
            pair.codegen(state);
        }
    }
}

/// A `key=value` keyword argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashPair {
    /// Whitespace before the key.
    pub leading: String,
    pub key: String,
    /// The `=` with any surrounding whitespace, as written.
    pub separator: String,
    pub value: Expression,
    pub loc: SourceSpan,
}

impl HashPair {
    /// Build a pair that prints as ` key=value`.
    pub fn new(key: impl Into<String>, value: Expression) -> Self {
        HashPair {
            leading: " ".to_string(),
            key: key.into(),
            separator: "=".to_string(),
            value,
            loc: SourceSpan::default(),
        }
    }
}

impl Codegen for HashPair {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.leading);
        state.add_token(&self.key);
        state.add_token(&self.separator);
        self.value.codegen(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let path = PathExpression::new("@model.name");
        assert!(path.is_data());
        assert!(!path.is_this());
        assert_eq!(path.head(), "model");

        let this = PathExpression::new("this.data-test-x");
        assert!(this.is_this());
        assert_eq!(this.head(), "this");
    }

    #[test]
    fn literal_builders() {
        let t = Literal::boolean(true);
        assert_eq!(t.raw, "true");
        assert_eq!(t.as_bool(), Some(true));

        let s = Literal::string("say \"hi\"");
        assert_eq!(s.raw, "\"say \\\"hi\\\"\"");
        assert_eq!(s.string_value().as_deref(), Some("say \"hi\""));
    }

    #[test]
    fn hash_pair_codegen() {
        let pair = HashPair::new(
            "data-test-x",
            Expression::Literal(Literal::boolean(true)),
        );
        let mut state = CodegenState::default();
        pair.codegen(&mut state);
        assert_eq!(state.to_string(), " data-test-x=true");
    }

    #[test]
    fn sub_expression_codegen() {
        let sub = SubExpression {
            leading: String::new(),
            path: Expression::Path(PathExpression::new("concat")),
            params: vec![Param::new(Expression::Literal(Literal::string("a")))],
            hash: Hash {
                pairs: vec![HashPair::new(
                    "sep",
                    Expression::Literal(Literal::string("-")),
                )],
                loc: SourceSpan::default(),
            },
            trailing: String::new(),
            loc: SourceSpan::default(),
        };
        let expr = Expression::SubExpression(Box::new(sub));
        assert_eq!(expr.source_text(), "(concat \"a\" sep=\"-\")");
        assert_eq!(expr.kind(), ExpressionKind::SubExpression);
    }
}
