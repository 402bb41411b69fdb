//! Procedural macro implementation for `maranget`.
//!
//! Users should use the main `maranget` crate, which re-exports these
//! macros. This crate parses the surface token grammar, assembles the
//! `(occurrences, clauses)` pair, hands it to `maranget-core`, and emits
//! the returned token stream.
//!
//! # Architecture
//!
//! 1. **Parse** (`input.rs`, `pattern.rs`): tokenize macro input into a
//!    [`maranget_core::PatternMatrix`].
//! 2. **Compile** (`maranget_core::compile_match`): Maranget's algorithm.
//! 3. **Emit**: the returned `TokenStream` becomes the macro's expansion.

mod input;
mod pattern;

use proc_macro::TokenStream;
use syn::parse_macro_input;

use input::{Match1Input, MatchInput, MatchVInput};
use maranget_core::{CompileCtx, VectorKind};

fn expand(
    occurrences: Vec<syn::Expr>,
    rows: Vec<input::RowInput>,
    vector_kind: VectorKind,
) -> proc_macro2::TokenStream {
    let occs = input::lift_occurrences(&occurrences);
    let matrix = input::build_matrix(rows, occs);
    let mut ctx = CompileCtx::new(vector_kind, cfg!(feature = "trace"));
    maranget_core::compile_match(&matrix, &mut ctx)
}

/// `match_patterns!([occ1, occ2, ...]; [p1, p2] => action1, [p3, p4] => action2, _ => fallback)`
#[proc_macro]
pub fn match_patterns(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as MatchInput);
    TokenStream::from(expand(parsed.occurrences, parsed.rows, VectorKind::default()))
}

/// `match1!(expr; p1 => action1, p2 => action2, _ => fallback)`: the
/// single-occurrence framing of `match_patterns!`.
#[proc_macro]
pub fn match1(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as Match1Input);
    TokenStream::from(expand(vec![parsed.occurrence], parsed.rows, VectorKind::default()))
}

/// `matchv!(VecDeque; [occ1, occ2]; [p1, p2] => action1, _ => fallback)`:
/// `match_patterns!` with the vector-kind tag set for the duration of the
/// compile.
#[proc_macro]
pub fn matchv(input: TokenStream) -> TokenStream {
    let parsed = parse_macro_input!(input as MatchVInput);
    TokenStream::from(expand(parsed.inner.occurrences, parsed.inner.rows, parsed.kind))
}
