//! The decision DAG: the compiled output of [`crate::compile::compile`].
//!
//! Acyclic by construction; nodes aren't deduplicated/shared. Sharing is an
//! optimization, not a correctness requirement.

use proc_macro2::TokenStream;
use syn::{Expr, Ident};

use crate::occurrence::Occurrence;
use crate::pattern::Pattern;

#[derive(Debug, Clone)]
pub enum Node {
    /// Emit `action` under `bindings`.
    Leaf { action: Expr, bindings: Vec<(Ident, TokenStream)> },
    /// Emit a runtime failure.
    Fail,
    /// Introduce `bindings` then evaluate `inner`.
    Bind { bindings: Vec<(Ident, TokenStream)>, inner: Box<Node> },
    /// Splice a raw `let` statement (already fully formed, e.g. a map
    /// lookup table or a vector coercion) ahead of `inner`. Distinct from
    /// `Bind`, whose entries are bare name/value pairs the lowering pass
    /// turns into `let` statements itself.
    Prelude { stmt: TokenStream, inner: Box<Node> },
    /// Evaluate `occurrence`, test each case in order, fall through to
    /// `default`.
    Switch {
        occurrence: Occurrence,
        cases: Vec<(Pattern, Node)>,
        default: Box<Node>,
    },
}
