//! Positional selector promotion.
//!
//! Rewrites invocations such as `{{widget data-test-widget}}` so the selector
//! becomes a keyword argument: `{{widget data-test-widget=true}}`.
//!
//! For each mustache or block statement:
//!
//! 1. Split positional arguments into selector candidates and kept arguments
//! 2. No candidates: leave the node alone
//! 3. One candidate with the fast path on: drop it from the positional list
//!    and leave the tag clean, reporting a [`Replacement`] so the printed text
//!    can be patched with `=true` afterwards
//! 4. Otherwise: prepend one `name=true` pair per candidate to the hash and
//!    mark the tag dirty so the printer regenerates it
//!
//! Element modifiers and sub-expressions are never rewritten.

use thiserror::Error;
use tracing::debug;

use tug_core::span::SourceSpan;
use tug_hbs::{
    walk_template_mut, Arguments, BlockStatement, Expression, HashPair, Literal,
    MustacheStatement, Param, Template, VisitResult, VisitorMut,
};

use crate::selector::SelectorPattern;

/// Width of the `=true` suffix added to a promoted selector.
const TRUE_SUFFIX_COLUMNS: u32 = 5;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised by the promotion rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoteError {
    /// The node has selector candidates but no keyword-argument list to move
    /// them into.
    #[error("`{name}` at {} has no keyword argument list", loc.start)]
    MissingHash { name: String, loc: SourceSpan },
}

// ============================================================================
// Types
// ============================================================================

/// Settings for the promotion rule.
#[derive(Debug, Clone)]
pub struct PromoteOptions {
    /// Naming convention that marks a positional argument as a selector.
    pub pattern: SelectorPattern,
    /// Handle a lone selector by text patch-up instead of regenerating the tag.
    pub fast_path: bool,
}

impl Default for PromoteOptions {
    fn default() -> Self {
        PromoteOptions {
            pattern: SelectorPattern::default(),
            fast_path: true,
        }
    }
}

/// A pending text substitution: the first free occurrence of `original` in
/// the printed output becomes `original=true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub original: String,
    /// Location of the selector in the source.
    pub loc: SourceSpan,
}

impl Replacement {
    pub fn replacement_text(&self) -> String {
        format!("{}=true", self.original)
    }
}

/// Result of applying the rule to one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeChange {
    pub changed: bool,
    pub replacement: Option<Replacement>,
}

/// Result of applying the rule to a whole template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionOutcome {
    /// Whether any node was rewritten.
    pub changed: bool,
    /// Fast-path substitutions, in document order.
    pub replacements: Vec<Replacement>,
}

// ============================================================================
// Promotion Rule
// ============================================================================

/// Apply the promotion rule to one mustache or block statement.
pub fn promote_node<N>(node: &mut N, options: &PromoteOptions) -> Result<NodeChange, PromoteError>
where
    N: Arguments + ?Sized,
{
    let (candidates, kept): (Vec<Param>, Vec<Param>) = node
        .params()
        .iter()
        .cloned()
        .partition(|param| options.pattern.is_selector(param));

    if candidates.is_empty() {
        return Ok(NodeChange::default());
    }
    if node.hash().is_none() {
        return Err(PromoteError::MissingHash {
            name: node.tag().name(),
            loc: node.loc(),
        });
    }

    let original_len = node.params().len();

    if options.fast_path && candidates.len() == 1 {
        let candidate = &candidates[0];
        let replacement = Replacement {
            original: candidate.value.source_text(),
            loc: candidate.loc(),
        };
        debug!(
            "promoting `{}` in `{}` at {} by patch-up",
            replacement.original,
            node.tag().name(),
            replacement.loc.start
        );
        node.replace_params(kept);
        return Ok(NodeChange {
            changed: true,
            replacement: Some(replacement),
        });
    }

    let mut pairs: Vec<HashPair> = candidates.iter().map(selector_pair).collect();

    if pairs.len() == 1 && original_len == 1 {
        let arg = &candidates[0];
        let arg_loc = arg.loc();
        let pair = &mut pairs[0];
        pair.leading = arg.leading.clone();
        pair.loc = arg_loc.extend_end_columns(TRUE_SUFFIX_COLUMNS);
        let pair_end = pair.loc.end;
        if let Some(hash) = node.hash_mut() {
            hash.loc.start = hash.loc.start.max(arg_loc.start);
            hash.loc.end = hash.loc.end.max(pair_end);
        }
    }

    debug!(
        "promoting {} selector(s) in `{}` at {}",
        pairs.len(),
        node.tag().name(),
        node.loc().start
    );

    if let Some(hash) = node.hash_mut() {
        pairs.append(&mut hash.pairs);
        hash.pairs = pairs;
    }
    node.replace_params(kept);
    node.mark_dirty();

    Ok(NodeChange {
        changed: true,
        replacement: None,
    })
}

/// Build `name=true` for a selector candidate.
fn selector_pair(candidate: &Param) -> HashPair {
    let mut pair = HashPair::new(
        candidate.value.source_text(),
        Expression::Literal(Literal::boolean(true)),
    );
    pair.loc = candidate.loc();
    pair
}

// ============================================================================
// Traversal
// ============================================================================

/// Apply the promotion rule to every mustache and block statement in
/// document order, including nested blocks and `{{else if}}` chains.
///
/// Stops at the first [`PromoteError`]; nodes already visited keep their
/// rewrites.
pub fn promote_selectors(
    template: &mut Template,
    options: &PromoteOptions,
) -> Result<PromotionOutcome, PromoteError> {
    let mut promoter = Promoter {
        options,
        outcome: PromotionOutcome::default(),
        error: None,
    };
    walk_template_mut(&mut promoter, template);
    match promoter.error {
        Some(err) => Err(err),
        None => Ok(promoter.outcome),
    }
}

struct Promoter<'a> {
    options: &'a PromoteOptions,
    outcome: PromotionOutcome,
    error: Option<PromoteError>,
}

impl Promoter<'_> {
    fn apply<N: Arguments>(&mut self, node: &mut N) -> VisitResult {
        match promote_node(node, self.options) {
            Ok(change) => {
                self.outcome.changed |= change.changed;
                self.outcome.replacements.extend(change.replacement);
                VisitResult::Continue
            }
            Err(err) => {
                self.error = Some(err);
                VisitResult::Stop
            }
        }
    }
}

impl VisitorMut for Promoter<'_> {
    fn visit_mustache(&mut self, node: &mut MustacheStatement) -> VisitResult {
        self.apply(node)
    }

    fn visit_block(&mut self, node: &mut BlockStatement) -> VisitResult {
        self.apply(node)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tug_core::span::Position;
    use tug_hbs::{parse, print, Inverse, Statement};

    fn mustache(source: &str) -> MustacheStatement {
        match parse(source).unwrap().body.into_iter().next() {
            Some(Statement::Mustache(m)) => m,
            other => panic!("expected mustache, got {:?}", other),
        }
    }

    fn block(source: &str) -> BlockStatement {
        match parse(source).unwrap().body.into_iter().next() {
            Some(Statement::Block(b)) => b,
            other => panic!("expected block, got {:?}", other),
        }
    }

    fn slow() -> PromoteOptions {
        PromoteOptions {
            fast_path: false,
            ..PromoteOptions::default()
        }
    }

    fn keys(node: &impl Arguments) -> Vec<String> {
        node.hash()
            .map(|h| h.pairs.iter().map(|p| p.key.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn no_candidates_is_noop() {
        let mut node = mustache(r#"{{widget this.foo "data-test-lit" name="x"}}"#);
        let before = node.clone();
        let change = promote_node(&mut node, &PromoteOptions::default()).unwrap();
        assert!(!change.changed);
        assert_eq!(change.replacement, None);
        assert_eq!(node, before);
    }

    #[test]
    fn single_candidate_fast_path() {
        let mut node = mustache("{{widget data-test-widget}}");
        let change = promote_node(&mut node, &PromoteOptions::default()).unwrap();
        assert!(change.changed);
        let replacement = change.replacement.unwrap();
        assert_eq!(replacement.original, "data-test-widget");
        assert_eq!(replacement.replacement_text(), "data-test-widget=true");
        assert_eq!(replacement.loc.start, Position::new(1, 10));
        assert!(node.params().is_empty());
        assert!(node.hash().unwrap().get("data-test-widget").is_none());
        assert!(!node.tag.is_dirty());
        // Clean tag still prints its original text for the patch-up to find.
        let mut state = tug_hbs::CodegenState::default();
        tug_hbs::Codegen::codegen(&node, &mut state);
        assert_eq!(state.tokens, "{{widget data-test-widget}}");
    }

    #[test]
    fn fast_path_keeps_other_params_and_pairs() {
        let mut node = mustache(r#"{{widget this.model data-test-widget class="x"}}"#);
        let change = promote_node(&mut node, &PromoteOptions::default()).unwrap();
        assert!(change.replacement.is_some());
        assert_eq!(node.params().len(), 1);
        assert_eq!(keys(&node), vec!["class"]);
    }

    #[test]
    fn multiple_candidates_prepend_pairs_in_order() {
        let mut node = mustache(r#"{{widget data-test-widget data-test-other class="x"}}"#);
        let change = promote_node(&mut node, &PromoteOptions::default()).unwrap();
        assert!(change.changed);
        assert_eq!(change.replacement, None);
        assert!(node.params().is_empty());
        assert_eq!(keys(&node), vec!["data-test-widget", "data-test-other", "class"]);
        let first = &node.hash().unwrap().pairs[0];
        assert_eq!(first.value, Expression::Literal(Literal::boolean(true)));
        assert!(node.tag.is_dirty());
    }

    #[test]
    fn kept_params_preserve_order() {
        let mut node = mustache(r#"{{x data-test-a "one" data-test-b two}}"#);
        promote_node(&mut node, &PromoteOptions::default()).unwrap();
        let kept: Vec<String> = node.params().iter().map(|p| p.value.source_text()).collect();
        assert_eq!(kept, vec!["\"one\"", "two"]);
        assert_eq!(keys(&node), vec!["data-test-a", "data-test-b"]);
    }

    #[test]
    fn lone_argument_slow_path_aligns_location() {
        let mut node = mustache("{{widget   data-test-widget}}");
        let change = promote_node(&mut node, &slow()).unwrap();
        assert!(change.changed);
        assert_eq!(change.replacement, None);
        let hash = node.hash().unwrap();
        let pair = &hash.pairs[0];
        assert_eq!(pair.leading, "   ");
        assert_eq!(pair.loc.start, Position::new(1, 12));
        assert_eq!(pair.loc.end, Position::new(1, 33));
        assert!(hash.loc.start >= Position::new(1, 12));
        let mut state = tug_hbs::CodegenState::default();
        tug_hbs::Codegen::codegen(&node, &mut state);
        assert_eq!(state.tokens, "{{widget   data-test-widget=true}}");
    }

    #[test]
    fn one_candidate_among_params_slow_path_uses_default_spacing() {
        let mut node = mustache("{{widget this.x   data-test-widget}}");
        promote_node(&mut node, &slow()).unwrap();
        assert_eq!(node.hash().unwrap().pairs[0].leading, " ");
        let mut state = tug_hbs::CodegenState::default();
        tug_hbs::Codegen::codegen(&node, &mut state);
        assert_eq!(state.tokens, "{{widget this.x data-test-widget=true}}");
    }

    #[test]
    fn missing_hash_is_an_error() {
        let mut node = mustache("{{widget data-test-widget}}");
        node.tag.hash = None;
        let err = promote_node(&mut node, &PromoteOptions::default()).unwrap_err();
        assert!(matches!(err, PromoteError::MissingHash { ref name, .. } if name == "widget"));
        assert!(err.to_string().contains("1:1"), "{}", err);
    }

    #[test]
    fn missing_hash_without_candidates_is_fine() {
        let mut node = mustache("{{widget foo}}");
        node.tag.hash = None;
        let change = promote_node(&mut node, &PromoteOptions::default()).unwrap();
        assert!(!change.changed);
    }

    #[test]
    fn block_statement_promotes_like_mustache() {
        let mut node = block("{{#if data-test-flag}}body{{/if}}");
        let change = promote_node(&mut node, &PromoteOptions::default()).unwrap();
        assert_eq!(change.replacement.unwrap().original, "data-test-flag");
        assert!(node.params().is_empty());
    }

    #[test]
    fn template_traversal_reaches_nested_nodes() {
        let source = "{{#if a}}{{x data-test-one}}{{else if b}}{{y data-test-two}}{{else}}{{z data-test-three}}{{/if}}";
        let mut template = parse(source).unwrap();
        let outcome = promote_selectors(&mut template, &PromoteOptions::default()).unwrap();
        assert!(outcome.changed);
        let found: Vec<&str> = outcome
            .replacements
            .iter()
            .map(|r| r.original.as_str())
            .collect();
        assert_eq!(found, vec!["data-test-one", "data-test-two", "data-test-three"]);
    }

    #[test]
    fn chained_else_block_is_promoted() {
        let source = "{{#if a}}x{{else if data-test-b data-test-c}}y{{/if}}";
        let mut template = parse(source).unwrap();
        promote_selectors(&mut template, &PromoteOptions::default()).unwrap();
        let Statement::Block(outer) = &template.body[0] else {
            panic!("expected block");
        };
        let Some(Inverse::Chained(chained)) = &outer.inverse else {
            panic!("expected chained inverse");
        };
        assert_eq!(keys(&**chained), vec!["data-test-b", "data-test-c"]);
        assert_eq!(
            print(&template),
            "{{#if a}}x{{else if data-test-b=true data-test-c=true}}y{{/if}}"
        );
    }

    #[test]
    fn modifiers_and_sub_expressions_are_left_alone() {
        let source = r#"<div {{on "click" data-test-x}}>{{foo (bar data-test-y)}}</div>"#;
        let mut template = parse(source).unwrap();
        let outcome = promote_selectors(&mut template, &PromoteOptions::default()).unwrap();
        assert!(!outcome.changed);
        assert_eq!(print(&template), source);
    }

    #[test]
    fn second_pass_is_noop() {
        let mut template = parse("{{a data-test-x data-test-y}}{{b data-test-z}}").unwrap();
        let options = PromoteOptions::default();
        let first = promote_selectors(&mut template, &options).unwrap();
        assert!(first.changed);
        let second = promote_selectors(&mut template, &options).unwrap();
        assert_eq!(second, PromotionOutcome::default());
    }

    #[test]
    fn every_node_is_visited_after_a_change() {
        let mut template = parse("{{a data-test-a}}{{b}}{{c data-test-c}}").unwrap();
        let outcome = promote_selectors(&mut template, &PromoteOptions::default()).unwrap();
        assert_eq!(outcome.replacements.len(), 2);
    }
}
