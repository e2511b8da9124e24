// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Grammar for the inside of a mustache: `path params hash as |bp|`.
//!
//! ```text
//! <tag>        := ws <expr> (ws1 <arg>)* <blockparams>? ws
//! <arg>        := <pair> | <expr>
//! <pair>       := id ws "=" ws <expr>
//! <expr>       := <subexpr> | <string> | <path>
//! <subexpr>    := "(" ws <expr> (ws1 <arg>)* ws ")"
//! <path>       := "@"? <segment> (("." | "/") <segment>)*
//! <segment>    := ".." | "[" [^\]]* "]" | id
//! <blockparams>:= ws1 "as" ws1 "|" [^|]* "|"
//! ```
//!
//! Numbers and the keywords `true`, `false`, `null` and `undefined` lex as
//! paths and are classified afterwards.
//!
//! The grammar produces borrowed `Raw*` values whose slices point into the
//! template source; [`NodeBuilder`] turns them into owned nodes with source
//! locations.

use tug_core::span::{SourceSpan, Span};
use tug_core::text::LineIndex;
use winnow::ascii::{multispace0, multispace1};
use winnow::combinator::{alt, delimited, opt, repeat};
use winnow::error::{ErrMode, ParserError};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, take_till, take_while};
use winnow::ModalResult;

use super::errors::ParseError;
use crate::nodes::{
    Expression, Hash, HashPair, Literal, LiteralKind, Param, PathExpression, SubExpression,
};

// ============================================================================
// Raw syntax
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawExpr<'s> {
    Path(&'s str),
    String(&'s str),
    Sub(Box<RawSub<'s>>),
}

impl<'s> RawExpr<'s> {
    pub(crate) fn text(&self) -> &'s str {
        match self {
            RawExpr::Path(text) | RawExpr::String(text) => text,
            RawExpr::Sub(sub) => sub.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawSub<'s> {
    text: &'s str,
    leading: &'s str,
    callee: RawExpr<'s>,
    args: Vec<RawArg<'s>>,
    trailing: &'s str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawArg<'s> {
    Param {
        leading: &'s str,
        value: RawExpr<'s>,
    },
    Pair {
        leading: &'s str,
        key: &'s str,
        separator: &'s str,
        value: RawExpr<'s>,
    },
}

/// The parsed inside of a mustache or block opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawTag<'s> {
    pub leading: &'s str,
    pub callee: RawExpr<'s>,
    pub args: Vec<RawArg<'s>>,
    pub block_params: Option<&'s str>,
    pub trailing: &'s str,
}

// ============================================================================
// Grammar
// ============================================================================

/// Parse a complete tag body. Returns the offset (relative to `body`) and a
/// message when the body is not a valid invocation.
pub(crate) fn parse_tag_body(body: &str) -> Result<RawTag<'_>, (usize, String)> {
    let mut input = body;
    match tag.parse_next(&mut input) {
        Ok(raw) if input.is_empty() => Ok(raw),
        Ok(_) => {
            let offset = body.len() - input.len();
            let found = input.chars().next().unwrap_or(' ');
            Err((offset, format!("unexpected `{}`", found)))
        }
        Err(_) => {
            let offset = body.len() - input.len();
            let message = if body.trim().is_empty() {
                "empty mustache".to_string()
            } else {
                "expected a path, literal or sub-expression".to_string()
            };
            Err((offset, message))
        }
    }
}

fn tag<'s>(input: &mut &'s str) -> ModalResult<RawTag<'s>> {
    let leading = multispace0.parse_next(input)?;
    let callee = expression(input)?;
    let args = arguments(input)?;
    let block_params = opt(block_params).parse_next(input)?;
    let trailing = multispace0.parse_next(input)?;
    Ok(RawTag {
        leading,
        callee,
        args,
        block_params,
        trailing,
    })
}

fn expression<'s>(input: &mut &'s str) -> ModalResult<RawExpr<'s>> {
    alt((
        sub_expression,
        string_literal.map(RawExpr::String),
        path_text.map(RawExpr::Path),
    ))
    .parse_next(input)
}

/// Positional and keyword arguments, in source order.
///
/// Stops (without consuming the separating whitespace) at `)`, at block
/// params or at the end of input.
fn arguments<'s>(input: &mut &'s str) -> ModalResult<Vec<RawArg<'s>>> {
    let mut args = Vec::new();
    loop {
        let checkpoint = *input;
        let leading: ModalResult<&'s str> = multispace1.parse_next(input);
        let Ok(leading) = leading else {
            *input = checkpoint;
            break;
        };
        if input.is_empty() || input.starts_with(')') || starts_block_params(checkpoint) {
            *input = checkpoint;
            break;
        }
        if let Some((key, separator, value)) = opt(hash_pair).parse_next(input)? {
            args.push(RawArg::Pair {
                leading,
                key,
                separator,
                value,
            });
            continue;
        }
        let value = expression(input)?;
        args.push(RawArg::Param { leading, value });
    }
    Ok(args)
}

fn hash_pair<'s>(input: &mut &'s str) -> ModalResult<(&'s str, &'s str, RawExpr<'s>)> {
    let key = take_while(1.., is_id_char).parse_next(input)?;
    let separator = (multispace0, '=', multispace0).take().parse_next(input)?;
    let value = expression(input)?;
    Ok((key, separator, value))
}

fn sub_expression<'s>(input: &mut &'s str) -> ModalResult<RawExpr<'s>> {
    let start = *input;
    '('.parse_next(input)?;
    let leading = multispace0.parse_next(input)?;
    let callee = expression(input)?;
    let args = arguments(input)?;
    let trailing = multispace0.parse_next(input)?;
    ')'.parse_next(input)?;
    let text = &start[..start.len() - input.len()];
    Ok(RawExpr::Sub(Box::new(RawSub {
        text,
        leading,
        callee,
        args,
        trailing,
    })))
}

fn string_literal<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((quoted::<'"'>, quoted::<'\''>)).parse_next(input)
}

/// A string delimited by `Q`, where `\Q` does not terminate it.
fn quoted<'s, const Q: char>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        Q,
        repeat::<_, _, (), _, _>(0.., alt((('\\', any).void(), none_of([Q]).void()))),
        Q,
    )
        .take()
        .parse_next(input)
}

fn path_text<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        opt('@'),
        segment,
        repeat::<_, _, (), _, _>(0.., (one_of(['.', '/']), segment)),
    )
        .take()
        .parse_next(input)
}

fn segment<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    alt((
        "..",
        delimited('[', take_till(0.., ']'), ']').take(),
        take_while(1.., is_id_char),
    ))
    .parse_next(input)
}

fn block_params<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    let checkpoint = *input;
    if !starts_block_params(checkpoint) {
        return Err(ErrMode::from_input(input));
    }
    (multispace1, "as", multispace1, '|', take_till(0.., '|'), '|')
        .take()
        .parse_next(input)
}

/// Whether `input` begins with whitespace followed by `as |`.
fn starts_block_params(input: &str) -> bool {
    let rest = input.trim_start();
    if rest.len() == input.len() {
        return false;
    }
    match rest.strip_prefix("as") {
        Some(after) => after.starts_with(char::is_whitespace) && after.trim_start().starts_with('|'),
        None => false,
    }
}

/// Characters allowed in an identifier segment.
fn is_id_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '!' | '"'
                | '#'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | '+'
                | ','
                | '.'
                | '/'
                | ';'
                | '<'
                | '='
                | '>'
                | '@'
                | '['
                | '\\'
                | ']'
                | '^'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
}

fn is_number(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.is_none_or(all_digits)
}

fn classify(text: &str) -> Option<LiteralKind> {
    match text {
        "true" | "false" => Some(LiteralKind::Boolean),
        "null" => Some(LiteralKind::Null),
        "undefined" => Some(LiteralKind::Undefined),
        _ if is_number(text) => Some(LiteralKind::Number),
        _ => None,
    }
}

// ============================================================================
// Node construction
// ============================================================================

/// Converts raw syntax borrowed from `source` into owned nodes.
pub(crate) struct NodeBuilder<'s> {
    source: &'s str,
    index: LineIndex<'s>,
}

impl<'s> NodeBuilder<'s> {
    pub fn new(source: &'s str) -> Self {
        NodeBuilder {
            source,
            index: LineIndex::new(source),
        }
    }

    pub fn index(&self) -> &LineIndex<'s> {
        &self.index
    }

    /// Byte offset of `part`, which must be a slice of the source.
    pub fn offset_of(&self, part: &str) -> usize {
        part.as_ptr() as usize - self.source.as_ptr() as usize
    }

    pub fn span_of(&self, part: &str) -> Span {
        let start = self.offset_of(part);
        Span::new(start, start + part.len())
    }

    pub fn loc_of(&self, part: &str) -> SourceSpan {
        self.index.source_span(self.span_of(part))
    }

    pub fn loc(&self, span: Span) -> SourceSpan {
        self.index.source_span(span)
    }

    pub fn expression(&self, raw: &RawExpr<'s>) -> Result<Expression, ParseError> {
        match raw {
            RawExpr::Path(text) => {
                let loc = self.loc_of(text);
                Ok(match classify(text) {
                    Some(kind) => Expression::Literal(Literal {
                        kind,
                        raw: text.to_string(),
                        loc,
                    }),
                    None => Expression::Path(PathExpression {
                        original: text.to_string(),
                        loc,
                    }),
                })
            }
            RawExpr::String(text) => Ok(Expression::Literal(Literal {
                kind: LiteralKind::String,
                raw: text.to_string(),
                loc: self.loc_of(text),
            })),
            RawExpr::Sub(sub) => {
                let path = self.expression(&sub.callee)?;
                let (params, hash) = self.arguments(&sub.args, sub.callee.text())?;
                Ok(Expression::SubExpression(Box::new(SubExpression {
                    leading: sub.leading.to_string(),
                    path,
                    params,
                    hash,
                    trailing: sub.trailing.to_string(),
                    loc: self.loc_of(sub.text),
                })))
            }
        }
    }

    /// Split arguments into params and a hash, rejecting a positional
    /// argument that follows a keyword argument.
    ///
    /// `callee` anchors the hash location when there are no pairs.
    pub fn arguments(
        &self,
        args: &[RawArg<'s>],
        callee: &'s str,
    ) -> Result<(Vec<Param>, Hash), ParseError> {
        let mut params = Vec::new();
        let mut pairs = Vec::new();
        let mut last_param_end = self.span_of(callee).end;
        let mut hash_span: Option<Span> = None;

        for arg in args {
            match arg {
                RawArg::Param { leading, value } => {
                    if !pairs.is_empty() {
                        let span = self.span_of(value.text());
                        return Err(ParseError::InvalidExpression {
                            message: "positional argument after keyword argument".to_string(),
                            span,
                            position: self.index.position(span.start),
                        });
                    }
                    last_param_end = self.span_of(value.text()).end;
                    params.push(Param {
                        leading: leading.to_string(),
                        value: self.expression(value)?,
                    });
                }
                RawArg::Pair {
                    leading,
                    key,
                    separator,
                    value,
                } => {
                    let span = Span::new(self.offset_of(key), self.span_of(value.text()).end);
                    hash_span = Some(match hash_span {
                        Some(existing) => Span::new(existing.start, span.end),
                        None => span,
                    });
                    pairs.push(HashPair {
                        leading: leading.to_string(),
                        key: key.to_string(),
                        separator: separator.to_string(),
                        value: self.expression(value)?,
                        loc: self.loc(span),
                    });
                }
            }
        }

        let loc = match hash_span {
            Some(span) => self.loc(span),
            None => SourceSpan::point(self.index.position(last_param_end)),
        };
        Ok((params, Hash { pairs, loc }))
    }
}
