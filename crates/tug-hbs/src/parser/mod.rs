// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Template parser.
//!
//! Parsing runs in two passes. The scanner splits the source into text runs,
//! comments and mustache tags, tracking just enough HTML state to tell an
//! element modifier (`<div {{on "click" f}}>`) from a mustache in content or
//! attribute-value position. The tree builder then pairs block openers with
//! their `{{else}}` and `{{/close}}` tags.

mod errors;
mod expression;

pub use errors::ParseError;

use memchr::memmem;
use tug_core::span::Span;

use crate::nodes::{
    BlockStatement, CloseTag, CommentStatement, ElseTag, Inverse, MustacheStatement, Statement,
    Tag, Template, TextNode,
};
use expression::{parse_tag_body, NodeBuilder};

/// Parse template source into a [`Template`].
pub fn parse_template(source: &str) -> Result<Template, ParseError> {
    let builder = NodeBuilder::new(source);
    let items = Scanner::new(source, &builder).scan()?;
    let body = TreeBuilder::new(&builder).build(items)?;
    Ok(Template {
        body,
        loc: builder.loc(Span::new(0, source.len())),
    })
}

// ============================================================================
// Scanner
// ============================================================================

/// Where a mustache sits, judged from the HTML around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Content,
    Modifier,
}

/// Scanner output. Block-structure items keep their byte span.
#[derive(Debug)]
enum Item {
    Statement(Statement),
    Open(Tag, Span),
    Else(ElseTag, Span),
    ElseChain(Tag, Span),
    Close(CloseTag, Span),
}

/// Open-tag state carried across text runs.
#[derive(Debug, Default)]
struct HtmlState {
    in_tag: bool,
    quote: Option<u8>,
    after_eq: bool,
}

impl HtmlState {
    fn advance(&mut self, text: &[u8]) {
        let mut i = 0;
        while i < text.len() {
            let b = text[i];
            if let Some(q) = self.quote {
                if b == q {
                    self.quote = None;
                }
            } else if self.in_tag {
                match b {
                    b'>' => {
                        self.in_tag = false;
                        self.after_eq = false;
                    }
                    b'"' | b'\'' if self.after_eq => {
                        self.quote = Some(b);
                        self.after_eq = false;
                    }
                    b'=' => self.after_eq = true,
                    b if b.is_ascii_whitespace() => {}
                    _ => self.after_eq = false,
                }
            } else if b == b'<' {
                if let Some(next) = text.get(i + 1) {
                    if next.is_ascii_alphabetic() || *next == b'/' {
                        self.in_tag = true;
                        self.after_eq = false;
                    }
                }
            }
            i += 1;
        }
    }

    fn placement(&self) -> Placement {
        if self.in_tag && self.quote.is_none() && !self.after_eq {
            Placement::Modifier
        } else {
            Placement::Content
        }
    }

    /// A mustache used as an unquoted attribute value ends the value.
    fn after_mustache(&mut self) {
        if self.quote.is_none() {
            self.after_eq = false;
        }
    }
}

struct Scanner<'s, 'b> {
    source: &'s str,
    builder: &'b NodeBuilder<'s>,
    html: HtmlState,
    /// Bytes before this offset have been fed to `html`.
    html_cursor: usize,
    items: Vec<Item>,
}

impl<'s, 'b> Scanner<'s, 'b> {
    fn new(source: &'s str, builder: &'b NodeBuilder<'s>) -> Self {
        Scanner {
            source,
            builder,
            html: HtmlState::default(),
            html_cursor: 0,
            items: Vec::new(),
        }
    }

    fn scan(mut self) -> Result<Vec<Item>, ParseError> {
        let source = self.source;
        let bytes = source.as_bytes();
        let finder = memmem::Finder::new(b"{{");
        let mut text_start = 0;
        let mut search = 0;

        while let Some(found) = finder.find(&bytes[search..]) {
            let start = search + found;
            if is_escaped(bytes, start) {
                search = start + 2;
                continue;
            }
            self.push_text(text_start, start);
            self.html.advance(&bytes[self.html_cursor..start]);
            let end = self.scan_mustache(start)?;
            self.html_cursor = end;
            text_start = end;
            search = end;
        }
        self.push_text(text_start, bytes.len());
        Ok(self.items)
    }

    fn push_text(&mut self, start: usize, end: usize) {
        if start < end {
            self.items.push(Item::Statement(Statement::Text(TextNode {
                chars: self.source[start..end].to_string(),
                loc: self.builder.loc(Span::new(start, end)),
            })));
        }
    }

    /// Scan the mustache starting at `start` and return its end offset.
    fn scan_mustache(&mut self, start: usize) -> Result<usize, ParseError> {
        let source = self.source;
        let rest = &source[start..];

        if rest.starts_with("{{{{") {
            return Err(self.unsupported("raw blocks", start, start + 4));
        }
        let triple = rest.starts_with("{{{");
        let mut head = if triple { 3 } else { 2 };
        if rest[head..].starts_with('~') {
            head += 1;
        }

        if !triple && rest[head..].starts_with('!') {
            return self.scan_comment(start, head);
        }

        let close = if triple { "}}}" } else { "}}" };
        let end = find_close(source, start + head, close)
            .ok_or_else(|| self.unclosed("mustache", start, start + head))?;
        let mut closer_start = end - close.len();
        if closer_start > start + head && source.as_bytes()[closer_start - 1] == b'~' {
            closer_start -= 1;
        }
        let opener = &source[start..start + head];
        let closer = &source[closer_start..end];
        let inner = &source[start + head..closer_start];
        let raw = &source[start..end];
        let span = Span::new(start, end);

        if triple {
            let tag = self.tag(opener, inner, closer, raw)?;
            self.items.push(Item::Statement(Statement::Mustache(MustacheStatement {
                tag,
                trusting: true,
            })));
            self.html.after_mustache();
            return Ok(end);
        }

        match inner.as_bytes().first() {
            Some(b'#') => {
                if inner[1..].starts_with('>') {
                    return Err(self.unsupported("partial blocks", start, end));
                }
                if inner[1..].starts_with('*') {
                    return Err(self.unsupported("decorator blocks", start, end));
                }
                let opener = &source[start..start + head + 1];
                let tag = self.tag(opener, &inner[1..], closer, raw)?;
                self.items.push(Item::Open(tag, span));
            }
            Some(b'/') => {
                let path = inner[1..].trim();
                let close = CloseTag {
                    raw: raw.to_string(),
                    path: path.to_string(),
                    loc: self.builder.loc(span),
                };
                self.items.push(Item::Close(close, span));
            }
            Some(b'^') => {
                if !inner[1..].trim().is_empty() {
                    return Err(self.unsupported("inverse sections", start, end));
                }
                self.items.push(Item::Else(self.else_tag(raw, span), span));
            }
            Some(b'>') => return Err(self.unsupported("partials", start, end)),
            Some(b'*') => return Err(self.unsupported("decorators", start, end)),
            _ => {
                let trimmed = inner.trim_start();
                let keyword_at = inner.len() - trimmed.len();
                match trimmed.strip_prefix("else") {
                    Some(after) if after.trim().is_empty() => {
                        self.items.push(Item::Else(self.else_tag(raw, span), span));
                    }
                    Some(after) if after.starts_with(char::is_whitespace) => {
                        let opener_end = start + head + keyword_at + "else".len();
                        let opener = &source[start..opener_end];
                        let tag = self.tag(opener, after, closer, raw)?;
                        self.items.push(Item::ElseChain(tag, span));
                    }
                    _ => {
                        let tag = self.tag(opener, inner, closer, raw)?;
                        let mustache = MustacheStatement {
                            tag,
                            trusting: false,
                        };
                        let statement = match self.html.placement() {
                            Placement::Modifier => Statement::Modifier(mustache),
                            Placement::Content => Statement::Mustache(mustache),
                        };
                        self.items.push(Item::Statement(statement));
                        self.html.after_mustache();
                    }
                }
            }
        }
        Ok(end)
    }

    fn scan_comment(&mut self, start: usize, head: usize) -> Result<usize, ParseError> {
        let source = self.source;
        let body_start = start + head + 1;
        let long = source[body_start..].starts_with("--");
        let (value_start, end, value_end) = if long {
            let value_start = body_start + 2;
            let end = find_long_comment_end(source, value_start)
                .ok_or_else(|| self.unclosed("comment", start, value_start))?;
            let mut value_end = end - 2;
            if source.as_bytes()[value_end - 1] == b'~' {
                value_end -= 1;
            }
            (value_start, end, value_end - 2)
        } else {
            let end = memmem::find(&source.as_bytes()[body_start..], b"}}")
                .map(|i| body_start + i + 2)
                .ok_or_else(|| self.unclosed("comment", start, body_start))?;
            let mut value_end = end - 2;
            if value_end > body_start && source.as_bytes()[value_end - 1] == b'~' {
                value_end -= 1;
            }
            (body_start, end, value_end)
        };
        self.items
            .push(Item::Statement(Statement::Comment(CommentStatement {
                raw: source[start..end].to_string(),
                value: source[value_start..value_end].to_string(),
                loc: self.builder.loc(Span::new(start, end)),
            })));
        Ok(end)
    }

    /// Build a clean tag from its pieces; `body` is the text between the
    /// opener and the closer.
    fn tag(&self, opener: &str, body: &'s str, closer: &str, raw: &str) -> Result<Tag, ParseError> {
        let parsed = parse_tag_body(body).map_err(|(offset, message)| {
            let at = self.builder.offset_of(body) + offset;
            let span = Span::new(at, (at + 1).min(self.source.len()));
            ParseError::InvalidExpression {
                message,
                span,
                position: self.builder.index().position(at),
            }
        })?;
        let path = self.builder.expression(&parsed.callee)?;
        let (params, hash) = self.builder.arguments(&parsed.args, parsed.callee.text())?;
        let mut tag = Tag::new(opener, path, closer).with_original(raw);
        tag.leading = parsed.leading.to_string();
        tag.params = params;
        tag.hash = Some(hash);
        tag.block_params = parsed.block_params.map(str::to_string);
        tag.trailing = parsed.trailing.to_string();
        tag.loc = self.builder.loc_of(raw);
        Ok(tag)
    }

    fn else_tag(&self, raw: &str, span: Span) -> ElseTag {
        ElseTag {
            raw: raw.to_string(),
            loc: self.builder.loc(span),
        }
    }

    fn unclosed(&self, what: &str, start: usize, end: usize) -> ParseError {
        ParseError::Unclosed {
            what: what.to_string(),
            span: Span::new(start, end),
            position: self.builder.index().position(start),
        }
    }

    fn unsupported(&self, what: &'static str, start: usize, end: usize) -> ParseError {
        ParseError::Unsupported {
            what,
            span: Span::new(start, end),
            position: self.builder.index().position(start),
        }
    }
}

/// `\{{` is literal text; `\\{{` is an escaped backslash before a mustache.
fn is_escaped(bytes: &[u8], start: usize) -> bool {
    start >= 1 && bytes[start - 1] == b'\\' && !(start >= 2 && bytes[start - 2] == b'\\')
}

/// Find the end (exclusive) of the first `close` at or after `from` that is
/// not inside a string literal.
fn find_close(source: &str, from: usize, close: &str) -> Option<usize> {
    let bytes = source.as_bytes();
    let close = close.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => {
                if b == b'"' || b == b'\'' {
                    quote = Some(b);
                } else if bytes[i..].starts_with(close) {
                    return Some(i + close.len());
                }
            }
        }
        i += 1;
    }
    None
}

/// End of a `{{!-- ... --}}` comment whose body starts at `from`.
fn find_long_comment_end(source: &str, from: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    memmem::find_iter(&bytes[from..], b"}}")
        .map(|i| from + i)
        .find(|&at| {
            let before = &bytes[from..at];
            before.ends_with(b"--") || before.ends_with(b"--~")
        })
        .map(|at| at + 2)
}

// ============================================================================
// Tree builder
// ============================================================================

/// A block whose close tag has not been seen yet.
struct Frame {
    open: Tag,
    open_span: Span,
    program: Vec<Statement>,
    inverse: Option<(ElseTag, Vec<Statement>)>,
    /// Opened by `{{else if ...}}`; closes with its parent.
    chained: bool,
    /// An `{{else if ...}}` frame sits above this one.
    has_chain: bool,
}

impl Frame {
    fn new(open: Tag, open_span: Span, chained: bool) -> Self {
        Frame {
            open,
            open_span,
            program: Vec::new(),
            inverse: None,
            chained,
            has_chain: false,
        }
    }

    fn body_mut(&mut self) -> &mut Vec<Statement> {
        match &mut self.inverse {
            Some((_, body)) => body,
            None => &mut self.program,
        }
    }

    fn finish(
        self,
        chain: Option<BlockStatement>,
        close: Option<CloseTag>,
        end: usize,
        builder: &NodeBuilder<'_>,
    ) -> BlockStatement {
        let inverse = match (self.inverse, chain) {
            (_, Some(child)) => Some(Inverse::Chained(Box::new(child))),
            (Some((tag, body)), None) => Some(Inverse::Else { tag, body }),
            (None, None) => None,
        };
        BlockStatement {
            open: self.open,
            program: self.program,
            inverse,
            close,
            loc: builder.loc(Span::new(self.open_span.start, end)),
        }
    }
}

struct TreeBuilder<'b, 's> {
    builder: &'b NodeBuilder<'s>,
    root: Vec<Statement>,
    stack: Vec<Frame>,
}

impl<'b, 's> TreeBuilder<'b, 's> {
    fn new(builder: &'b NodeBuilder<'s>) -> Self {
        TreeBuilder {
            builder,
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn build(mut self, items: Vec<Item>) -> Result<Vec<Statement>, ParseError> {
        for item in items {
            match item {
                Item::Statement(statement) => self.push(statement),
                Item::Open(tag, span) => self.stack.push(Frame::new(tag, span, false)),
                Item::Else(tag, span) => {
                    let frame = self.open_frame(&tag.raw, span)?;
                    frame.inverse = Some((tag, Vec::new()));
                }
                Item::ElseChain(tag, span) => {
                    let raw = tag.original().unwrap_or_default().to_string();
                    let frame = self.open_frame(&raw, span)?;
                    frame.has_chain = true;
                    self.stack.push(Frame::new(tag, span, true));
                }
                Item::Close(close, span) => self.close(close, span)?,
            }
        }

        if let Some(frame) = self.stack.pop() {
            return Err(ParseError::Unclosed {
                what: format!("block `{}`", frame.open.name()),
                span: frame.open_span,
                position: self.builder.index().position(frame.open_span.start),
            });
        }
        Ok(self.root)
    }

    fn push(&mut self, statement: Statement) {
        match self.stack.last_mut() {
            Some(frame) => frame.body_mut().push(statement),
            None => self.root.push(statement),
        }
    }

    fn unexpected(&self, what: String, span: Span) -> ParseError {
        ParseError::Unexpected {
            what,
            span,
            position: self.builder.index().position(span.start),
        }
    }

    /// The innermost block, which must still be in its program section.
    fn open_frame(&mut self, raw: &str, span: Span) -> Result<&mut Frame, ParseError> {
        let in_inverse = self
            .stack
            .last()
            .map(|frame| frame.inverse.is_some() || frame.has_chain);
        match in_inverse {
            None => Err(self.unexpected(format!("`{}` outside of a block", raw), span)),
            Some(true) => Err(self.unexpected(format!("`{}` after `{{{{else}}}}`", raw), span)),
            Some(false) => {
                let top = self.stack.len() - 1;
                Ok(&mut self.stack[top])
            }
        }
    }

    /// Close the innermost non-chained block, folding any `{{else if}}`
    /// frames above it into its inverse.
    fn close(&mut self, close: CloseTag, span: Span) -> Result<(), ParseError> {
        let mut chain: Option<BlockStatement> = None;
        loop {
            let Some(frame) = self.stack.pop() else {
                return Err(self.unexpected(
                    format!("`{}` without an open block", close.raw),
                    span,
                ));
            };
            if frame.chained {
                chain = Some(frame.finish(chain, None, span.start, self.builder));
                continue;
            }
            let name = frame.open.name();
            if name != close.path {
                return Err(ParseError::MismatchedClose {
                    expected: name,
                    found: close.raw,
                    span,
                    position: self.builder.index().position(span.start),
                });
            }
            let block = frame.finish(chain, Some(close), span.end, self.builder);
            self.push(Statement::Block(block));
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Arguments, ExpressionKind, LiteralKind, NodeKind};

    fn parse(src: &str) -> Template {
        parse_template(src).unwrap_or_else(|e| panic!("{:?} failed: {}", src, e))
    }

    fn only_mustache(template: &Template) -> &MustacheStatement {
        match template.body.as_slice() {
            [Statement::Mustache(m)] => m,
            other => panic!("expected a single mustache, got {:?}", other),
        }
    }

    #[test]
    fn plain_text() {
        let t = parse("<p>hello</p>\n");
        assert_eq!(t.body.len(), 1);
        assert!(matches!(t.body[0], Statement::Text(_)));
    }

    #[test]
    fn mustache_params_and_hash() {
        let t = parse("{{widget data-test-widget data-test-other class=\"x\"}}");
        let m = only_mustache(&t);
        assert_eq!(m.tag.name(), "widget");
        assert_eq!(m.params().len(), 2);
        assert_eq!(m.params()[0].value.kind(), ExpressionKind::Path);
        let hash = m.hash().unwrap();
        assert_eq!(hash.pairs.len(), 1);
        assert_eq!(hash.pairs[0].key, "class");
        assert!(!m.tag.is_dirty());
    }

    #[test]
    fn param_locations() {
        let t = parse("<div>\n  {{widget data-test-x}}\n</div>");
        let m = match &t.body[1] {
            Statement::Mustache(m) => m,
            other => panic!("expected mustache, got {:?}", other),
        };
        let loc = m.params()[0].loc();
        assert_eq!(loc.start.line, 2);
        assert_eq!(loc.start.column, 12);
        assert_eq!(loc.end.column, 23);
        assert_eq!(m.tag.loc.start.column, 3);
    }

    #[test]
    fn literals_are_classified() {
        let t = parse("{{helper 1 true null undefined \"s\" 'q'}}");
        let kinds: Vec<_> = only_mustache(&t)
            .params()
            .iter()
            .map(|p| match &p.value {
                crate::nodes::Expression::Literal(l) => l.kind,
                other => panic!("expected literal, got {:?}", other),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                LiteralKind::Number,
                LiteralKind::Boolean,
                LiteralKind::Null,
                LiteralKind::Undefined,
                LiteralKind::String,
                LiteralKind::String
            ]
        );
    }

    #[test]
    fn block_with_else() {
        let t = parse("{{#if data-test-flag}}yes{{else}}no{{/if}}");
        let block = match &t.body[0] {
            Statement::Block(b) => b,
            other => panic!("expected block, got {:?}", other),
        };
        assert_eq!(block.open.name(), "if");
        assert_eq!(block.open.opener, "{{#");
        assert_eq!(block.params().len(), 1);
        assert_eq!(block.program.len(), 1);
        assert!(matches!(block.inverse, Some(Inverse::Else { .. })));
        assert_eq!(block.close.as_ref().unwrap().path, "if");
        assert_eq!(t.body[0].kind(), NodeKind::BlockInvocation);
    }

    #[test]
    fn chained_else_if() {
        let src = "{{#if a}}A{{else if data-test-b}}B{{else}}C{{/if}}";
        let t = parse(src);
        let block = match &t.body[0] {
            Statement::Block(b) => b,
            other => panic!("expected block, got {:?}", other),
        };
        let chained = match &block.inverse {
            Some(Inverse::Chained(b)) => b,
            other => panic!("expected chained inverse, got {:?}", other),
        };
        assert!(chained.is_chained());
        assert_eq!(chained.open.opener, "{{else");
        assert_eq!(chained.open.name(), "if");
        assert_eq!(chained.params()[0].value.source_text(), "data-test-b");
        assert!(matches!(chained.inverse, Some(Inverse::Else { .. })));
    }

    #[test]
    fn block_params() {
        let t = parse("{{#each items as |item|}}{{item}}{{/each}}");
        match &t.body[0] {
            Statement::Block(b) => {
                assert_eq!(b.open.block_params.as_deref(), Some(" as |item|"));
                assert_eq!(b.program.len(), 1);
            }
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn comments_and_escapes() {
        let t = parse("{{!-- a }} b --}}\\{{not-a-mustache}}{{! short }}");
        assert_eq!(t.body.len(), 3);
        match &t.body[0] {
            Statement::Comment(c) => assert_eq!(c.value, " a }} b "),
            other => panic!("expected comment, got {:?}", other),
        }
        assert!(matches!(t.body[1], Statement::Text(_)));
        match &t.body[2] {
            Statement::Comment(c) => assert_eq!(c.value, " short "),
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn whitespace_control() {
        let t = parse("{{~widget data-test-a~}}");
        let m = only_mustache(&t);
        assert_eq!(m.tag.opener, "{{~");
        assert_eq!(m.tag.closer, "~}}");
        assert_eq!(m.params().len(), 1);
    }

    #[test]
    fn trusted_mustache() {
        let t = parse("{{{raw-html data-test-raw}}}");
        let m = only_mustache(&t);
        assert!(m.trusting);
        assert_eq!(m.tag.closer, "}}}");
    }

    #[test]
    fn modifiers_versus_attribute_values() {
        let t = parse("<div {{on \"click\" this.go}} class={{cls}} title=\"{{t}}\">{{body}}</div>");
        let kinds: Vec<NodeKind> = t
            .body
            .iter()
            .filter(|s| !matches!(s, Statement::Text(_)))
            .map(Statement::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Other,
                NodeKind::Invocation,
                NodeKind::Invocation,
                NodeKind::Invocation
            ]
        );
        assert!(matches!(t.body[1], Statement::Modifier(_)));
    }

    #[test]
    fn closing_brace_inside_string() {
        let t = parse("{{t \"}}\" data-test-x}}");
        assert_eq!(only_mustache(&t).params().len(), 2);
    }

    #[test]
    fn errors() {
        let cases = [
            ("{{foo", "unclosed"),
            ("{{!-- never", "unclosed"),
            ("{{#if a}}x", "unclosed"),
            ("{{#if a}}x{{/each}}", "does not close"),
            ("{{/if}}", "unexpected"),
            ("{{else}}", "unexpected"),
            ("{{#if a}}{{else}}{{else}}{{/if}}", "unexpected"),
            ("{{> partial}}", "not supported"),
            ("{{{{raw}}}}x{{{{/raw}}}}", "not supported"),
            ("{{foo a=1 b}}", "positional argument after keyword argument"),
            ("{{}}", "empty mustache"),
        ];
        for (src, needle) in cases {
            let err = parse_template(src).expect_err(src);
            assert!(
                err.to_string().contains(needle),
                "{:?}: {} does not mention {:?}",
                src,
                err,
                needle
            );
        }
    }

    #[test]
    fn error_offsets() {
        let err = parse_template("ab\n{{foo").unwrap_err();
        assert_eq!(err.offset(), 3);
        assert_eq!(err.position().line, 2);

        let err = parse_template("{{#if a}}\n{{/each}}").unwrap_err();
        assert_eq!(err.offset(), 10);
    }
}
