// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree

//! Core traits shared by CST nodes.
//!
//! # Code Generation
//!
//! Every node implements [`Codegen`], appending its source text to a
//! [`CodegenState`]. Untouched tags print their original text verbatim; see
//! [`Tag`](super::Tag) for the dirty-tracking rules.
//!
//! # Argument Capability
//!
//! Mustache statements and block statements share the same argument-list
//! shape (a callee, positional params, a keyword hash). [`Arguments`] exposes
//! that shape so code that rewrites arguments is written once for both.

use std::fmt;

use tug_core::span::SourceSpan;

use super::expression::{Hash, Param};
use super::statement::Tag;

/// Accumulates printed source text.
#[derive(Debug, Default, Clone)]
pub struct CodegenState {
    pub tokens: String,
}

impl CodegenState {
    pub fn add_token(&mut self, tok: &str) {
        self.tokens.push_str(tok);
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens)
    }
}

pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);
}

impl<T: Codegen> Codegen for Vec<T> {
    fn codegen(&self, state: &mut CodegenState) {
        for item in self {
            item.codegen(state);
        }
    }
}

impl<T: Codegen> Codegen for Option<T> {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(item) = self {
            item.codegen(state);
        }
    }
}

impl<T: Codegen> Codegen for Box<T> {
    fn codegen(&self, state: &mut CodegenState) {
        (**self).codegen(state);
    }
}

/// Positional and keyword arguments of an invocation-style node.
///
/// Mutating the argument lists through this trait does **not** mark the tag
/// dirty; callers decide whether the printer should regenerate the tag
/// ([`Arguments::mark_dirty`]) or keep printing its original text.
pub trait Arguments {
    fn tag(&self) -> &Tag;

    fn tag_mut(&mut self) -> &mut Tag;

    fn params(&self) -> &[Param] {
        &self.tag().params
    }

    /// Replace the positional arguments, returning the previous ones.
    fn replace_params(&mut self, params: Vec<Param>) -> Vec<Param> {
        std::mem::replace(&mut self.tag_mut().params, params)
    }

    /// The keyword-argument container, if the node has one.
    fn hash(&self) -> Option<&Hash> {
        self.tag().hash.as_ref()
    }

    fn hash_mut(&mut self) -> Option<&mut Hash> {
        self.tag_mut().hash.as_mut()
    }

    /// Make the printer regenerate this node's tag from its parts.
    fn mark_dirty(&mut self) {
        self.tag_mut().mark_dirty();
    }

    fn loc(&self) -> SourceSpan {
        self.tag().loc
    }
}
