//! The pattern-match-to-decision-tree compiler core: pattern AST, the
//! occurrence model, pattern matrices, Maranget's specialization rules,
//! the matrix compiler, and the DAG lowering pass.
//!
//! This crate has no `proc-macro` entry point and no knowledge of concrete
//! surface syntax; it consumes an already-built [`PatternMatrix`] and
//! returns a [`proc_macro2::TokenStream`]. `maranget-macros` is the only
//! caller.

pub mod compile;
pub mod ctx;
pub mod dag;
pub mod fresh;
pub mod hostexpr;
pub mod lower;
pub mod matrix;
pub mod occurrence;
pub mod ord;
pub mod pattern;
pub mod specialize;

pub use compile::compile;
pub use ctx::CompileCtx;
pub use dag::Node;
pub use hostexpr::HostExpr;
pub use lower::{lower, render};
pub use matrix::{PatternMatrix, PatternRow};
pub use occurrence::Occurrence;
pub use pattern::{Pattern, PatternKind, VectorKind};

/// Runs the full pipeline: compile a matrix to a DAG, lower it to a
/// host-expression tree, and render that tree to Rust tokens.
///
/// Resets the fresh-name counter first, so occurrence names are stable and
/// independent of any prior invocation in the same process.
pub fn compile_match(
    matrix: &PatternMatrix,
    ctx: &mut CompileCtx,
) -> proc_macro2::TokenStream {
    fresh::reset();
    let node = compile::compile(matrix, ctx);
    let rendered = lower::render(&lower::lower(&node, ctx.trace));
    if ctx.trace {
        quote::quote! {
            {
                let mut __maranget_trace: Vec<&'static str> = Vec::new();
                #rendered
            }
        }
    } else {
        rendered
    }
}
