//! Read-only scan for positional selectors that still need migrating.

use tug_core::span::SourceSpan;
use tug_hbs::{
    walk_template, Arguments, BlockStatement, MustacheStatement, Template, VisitResult, Visitor,
};

use crate::selector::SelectorPattern;

/// A positional selector found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorHit {
    pub selector: String,
    pub loc: SourceSpan,
}

/// List every positional selector the promotion rule would rewrite, in
/// document order.
pub fn find_selectors(template: &Template, pattern: &SelectorPattern) -> Vec<SelectorHit> {
    let mut collector = SelectorCollector {
        pattern,
        hits: Vec::new(),
    };
    walk_template(&mut collector, template);
    collector.hits
}

struct SelectorCollector<'a> {
    pattern: &'a SelectorPattern,
    hits: Vec<SelectorHit>,
}

impl SelectorCollector<'_> {
    fn collect(&mut self, node: &impl Arguments) {
        for param in node.params() {
            if let Some(selector) = self.pattern.selector_of(param) {
                self.hits.push(SelectorHit {
                    selector: selector.to_string(),
                    loc: param.loc(),
                });
            }
        }
    }
}

impl Visitor for SelectorCollector<'_> {
    fn visit_mustache(&mut self, node: &MustacheStatement) -> VisitResult {
        self.collect(node);
        VisitResult::Continue
    }

    fn visit_block(&mut self, node: &BlockStatement) -> VisitResult {
        self.collect(node);
        VisitResult::Continue
    }
}
