// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A Handlebars/Glimmer template parser and Concrete Syntax Tree (CST).
//!
//! The tree keeps every byte of the source: printing an untouched tree
//! reproduces the input exactly. Mustache and block tags remember their
//! original text and are only regenerated from their parts once marked dirty,
//! so a rewrite touches nothing but the tags it changes.
//!
//! # Quick Start
//!
//! ```
//! use tug_hbs::{parse, print};
//!
//! let source = "<p class={{cls}}>{{#if ok}}{{name}}{{/if}}</p>";
//! let template = parse(source).expect("parse error");
//! assert_eq!(print(&template), source);
//! ```

use std::cmp::min;

/// Template node types.
pub mod nodes;
pub use nodes::*;

mod parser;
pub use parser::ParseError;

/// Visitor infrastructure for template traversal.
pub mod visitor;
pub use visitor::{
    walk_block, walk_block_mut, walk_mustache, walk_mustache_mut, walk_statement,
    walk_statement_mut, walk_template, walk_template_mut, VisitResult, Visitor, VisitorMut,
};

// ============================================================================
// Parsing and printing
// ============================================================================

/// Parse template source into a [`Template`].
///
/// # Errors
///
/// Returns a [`ParseError`] for unterminated mustaches, comments or blocks,
/// mismatched or stray close and else tags, malformed expressions, and the
/// unsupported partial, decorator and raw-block forms.
pub fn parse(source: &str) -> Result<Template, ParseError> {
    parser::parse_template(source)
}

/// Print a template back to source text.
pub fn print(template: &Template) -> String {
    let mut state = CodegenState::default();
    template.codegen(&mut state);
    state.tokens
}

// ============================================================================
// Error formatting
// ============================================================================

/// Returns the byte offset of the beginning of line `n` (1-indexed).
fn bol_offset(source: &str, n: i64) -> usize {
    if n <= 1 {
        return 0;
    }
    source
        .match_indices('\n')
        .nth((n - 2) as usize)
        .map(|(index, _)| index + 1)
        .unwrap_or_else(|| source.len())
}

/// Formats a parse error with the surrounding source lines.
///
/// # Example
///
/// ```
/// use tug_hbs::{parse, prettify_error};
///
/// let source = "<p>\n{{name\n</p>";
/// let err = parse(source).unwrap_err();
/// let formatted = prettify_error(&err, source, "app/templates/x.hbs");
/// assert!(formatted.contains("unclosed mustache"));
/// ```
pub fn prettify_error(err: &ParseError, source: &str, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let context = 1;
    let position = err.position();
    let span = err.span();
    let line = i64::from(position.line);

    let line_start = (line - context).max(1) as usize;
    let start_offset = bol_offset(source, line - context);
    let end_offset = bol_offset(source, line + context + 1);
    let snippet = &source[start_offset..end_offset];

    let start = span.start.saturating_sub(start_offset).min(snippet.len());
    let end = span.end.saturating_sub(start_offset).min(snippet.len());
    let end = if start == end {
        min(end + 1, snippet.len())
    } else {
        end
    };
    let message = format!("{} at {}", err.label(), position);
    let title = format!("{}: {}", label, err);

    let rendered = Renderer::plain()
        .render(
            Level::Error.title(&title).snippet(
                Snippet::source(snippet)
                    .line_start(line_start)
                    .origin(label)
                    .fold(false)
                    .annotations(vec![Level::Error.span(start..end).label(&message)]),
            ),
        )
        .to_string();
    rendered
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trip_simple() {
        for src in [
            "",
            "plain text",
            "{{a}}",
            "{{{ b }}}",
            "{{~#if x~}} y {{~else~}} z {{~/if~}}",
            "<div {{on \"click\" (fn this.go 1)}} class=\"a {{b}}\"></div>",
            "{{!-- note --}}\\{{escaped}}",
            "{{#each list key=\"@index\" as |item i|}}\n  {{item}}\n{{/each}}\n",
        ] {
            let template = parse(src).unwrap_or_else(|e| panic!("'{}' doesn't parse: {}", src, e));
            assert_eq!(print(&template), src);
        }
    }

    #[test]
    fn bol_offset_first_line() {
        assert_eq!(bol_offset("abc\ndef", 1), 0);
        assert_eq!(bol_offset("abc\ndef", 0), 0);
    }

    #[test]
    fn bol_offset_later_lines() {
        assert_eq!(bol_offset("abc\ndef\nghi", 2), 4);
        assert_eq!(bol_offset("abc\ndef\nghi", 3), 8);
        assert_eq!(bol_offset("abc\ndef", 9), 7);
    }

    #[test]
    fn prettify_error_shows_context() {
        let source = "<ul>\n  {{#each items as |i|}}\n    <li>{{i}}</li>\n  {{/if}}\n</ul>\n";
        let err = parse(source).unwrap_err();
        let formatted = prettify_error(&err, source, "list.hbs");
        assert!(formatted.contains("list.hbs"), "{}", formatted);
        assert!(formatted.contains("{{/if}}"), "{}", formatted);
        assert!(formatted.contains("expected `{{/each}}`"), "{}", formatted);
    }

    #[test]
    fn prettify_error_at_end_of_input() {
        let source = "{{foo";
        let err = parse(source).unwrap_err();
        let formatted = prettify_error(&err, source, "x.hbs");
        assert!(formatted.contains("unclosed mustache"), "{}", formatted);
    }
}
