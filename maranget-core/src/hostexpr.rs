//! The abstract host-expression tree lowering targets, kept separate from
//! [`crate::dag::Node`] so the back end never has to reason about pattern
//! matrices, only expressions.

use proc_macro2::TokenStream;
use syn::Ident;

#[derive(Debug, Clone)]
pub enum HostExpr {
    /// `let a = ...; let b = ...; <inner>`
    Let(Vec<(Ident, TokenStream)>, Box<HostExpr>),
    /// A single raw statement spliced ahead of `<inner>` (a map lookup
    /// table or vector coercion binding already fully formed by
    /// [`crate::specialize`]).
    Stmt(TokenStream, Box<HostExpr>),
    /// `if <cond> { <then> } else { <else> }`
    If(TokenStream, Box<HostExpr>, Box<HostExpr>),
    /// A cascade of `if`/`else if` tests, falling through to a final
    /// unconditional branch.
    Cond(Vec<(TokenStream, HostExpr)>, Box<HostExpr>),
    /// The `Fail` path: a call to the runtime "no match" raiser.
    Call(TokenStream),
    /// An arbitrary expression, rendered verbatim.
    Literal(TokenStream),
    Name(Ident),
}
