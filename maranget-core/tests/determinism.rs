//! Property tests for two of the compiler's invariants: compiling the same
//! matrix twice yields byte-identical output, and an `Or` pattern expands to
//! the same decision as writing out its alternatives as separate rows.

use maranget_core::occurrence::Occurrence;
use maranget_core::pattern::{Lit, Pattern, PatternKind, VectorKind};
use maranget_core::{compile_match, CompileCtx, PatternMatrix, PatternRow};
use proptest::prelude::*;
use syn::parse_quote;

fn occurrence(name: &str) -> Occurrence {
    Occurrence::plain(syn::Ident::new(name, proc_macro2::Span::call_site()))
}

fn int_literal(n: i128) -> Pattern {
    Pattern::new(PatternKind::Literal { lit: Lit::Int(n), is_local: false, expr: parse_quote!(#n) })
}

/// Builds a matrix from a list of `(Some(n) | None, action_index)` rows,
/// where `None` means a wildcard row.
fn matrix_from(rows: &[(Option<i128>, i128)]) -> PatternMatrix {
    let rows = rows
        .iter()
        .map(|(lit, action)| {
            let pattern = match lit {
                Some(n) => int_literal(*n),
                None => Pattern::wildcard(),
            };
            PatternRow::new(vec![pattern], parse_quote!(#action))
        })
        .collect();
    PatternMatrix::new(rows, vec![occurrence("x")])
}

proptest! {
    #[test]
    fn compiling_the_same_matrix_twice_is_identical(
        rows in prop::collection::vec((prop::option::of(0i128..8), 0i128..1000), 1..8),
    ) {
        let matrix = matrix_from(&rows);
        let mut ctx_a = CompileCtx::new(VectorKind::default(), false);
        let mut ctx_b = CompileCtx::new(VectorKind::default(), false);
        let a = compile_match(&matrix, &mut ctx_a).to_string();
        let b = compile_match(&matrix, &mut ctx_b).to_string();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn or_pattern_matches_the_same_as_its_expanded_rows() {
    let or_row = PatternRow::new(
        vec![Pattern::new(PatternKind::Or { alts: vec![int_literal(1), int_literal(2)] })],
        parse_quote!("matched"),
    );
    let or_matrix = PatternMatrix::new(
        vec![or_row, PatternRow::new(vec![Pattern::wildcard()], parse_quote!("other"))],
        vec![occurrence("x")],
    );

    let expanded_matrix = PatternMatrix::new(
        vec![
            PatternRow::new(vec![int_literal(1)], parse_quote!("matched")),
            PatternRow::new(vec![int_literal(2)], parse_quote!("matched")),
            PatternRow::new(vec![Pattern::wildcard()], parse_quote!("other")),
        ],
        vec![occurrence("x")],
    );

    let mut ctx_a = CompileCtx::new(VectorKind::default(), false);
    let mut ctx_b = CompileCtx::new(VectorKind::default(), false);
    let or_tokens = compile_match(&or_matrix, &mut ctx_a).to_string();
    let expanded_tokens = compile_match(&expanded_matrix, &mut ctx_b).to_string();
    assert_eq!(or_tokens, expanded_tokens);
}
