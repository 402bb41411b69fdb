//! `lower(node) -> HostExpr` and the `render` back end that serializes a
//! `HostExpr` to Rust tokens.

use proc_macro2::TokenStream;
use quote::quote;

use crate::dag::Node;
use crate::hostexpr::HostExpr;
use crate::occurrence::{OccKind, Occurrence};
use crate::pattern::{Pattern, PatternKind};

/// The per-pattern-variant test expression a `Switch` case guards on.
///
/// Wildcard and Or never reach a `Switch` as the *chosen* case pattern
/// (wildcards are filtered out of the constructor set, and a top-level Or
/// is expanded away before a column is switched on), but both can still
/// appear nested inside a `Guard`'s inner pattern (`_ if pred`, `(1 | 2 if
/// pred)`), so they need real tests, not just a top-level assumption.
/// `Rest` only ever appears inside a `Seq`'s element list, never here.
fn to_test(pattern: &Pattern, occ: &Occurrence) -> TokenStream {
    let value = occ.bind_expr();
    match &pattern.kind {
        // A map-lookup occurrence's value is always `Option<V>` (the key
        // might be absent), so a by-value sub-pattern compares against
        // `Some(..)` rather than the bare looked-up value.
        PatternKind::Literal { expr, .. } if matches!(occ.kind, OccKind::Map { .. }) => {
            quote! { #value == Some(#expr) }
        }
        PatternKind::Literal { expr, .. } => quote! { #value == #expr },
        // `specialize_seq`'s end-of-sequence marker: the tail occurrence is
        // a slice, not a scalar, so it's tested for emptiness. `value` is
        // parenthesized because a tail occurrence's own expression can
        // already start with `&`, which would otherwise creep past the
        // method call and negate the wrong thing.
        PatternKind::SeqEnd => quote! { (#value).is_empty() },
        // Seq occurrences are sliced via `[0]`/`[1..]`; the head/tail
        // split is only valid once there's at least one element.
        PatternKind::Seq { .. } => quote! { !(#value).is_empty() },
        // The lookup protocol is resolved at the type level (the
        // occurrence's type already satisfies `Lookup`), so there's
        // nothing left to check at runtime.
        PatternKind::Map { .. } => quote! { true },
        // A MapCrash sub-pattern always sits in one of the per-key columns
        // a Map column was expanded into, so its occurrence carries the
        // `map_sym` the test actually needs to run against, not its own
        // (per-key) `bind_expr`, which is just that key's looked-up value.
        PatternKind::MapCrash { keys } => {
            let map_sym = match &occ.kind {
                OccKind::Map { map_sym, .. } => map_sym,
                _ => unreachable!("MapCrash only appears in a map-lookup column"),
            };
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            quote! { ::maranget::__rt::keys_equal(#map_sym, &[#(#keys),*]) }
        }
        PatternKind::Vector { elems, rest, .. } => {
            if *rest {
                let min = elems.len();
                quote! { (#value).len() >= #min }
            } else {
                let n = elems.len();
                quote! { (#value).len() == #n }
            }
        }
        PatternKind::Guard { inner, preds } => {
            // The predicates can reference the inner pattern's own capture
            // (`x if x > 0`), so its name(s) need binding before they run,
            // not just when the Guard's own child matrix eventually drops
            // this column.
            let mut lets = Vec::new();
            if let Some(name) = inner.wildcard_bind_name() {
                let val = occ.bind_expr();
                lets.push(quote! { let #name = #val; });
            }
            if let Some(name) = &inner.meta.as_name {
                let val = occ.bind_expr();
                lets.push(quote! { let #name = #val; });
            }
            let inner_test = to_test(inner, occ);
            let preds = preds.iter();
            quote! { { #(#lets)* (#inner_test) #(&& (#preds))* } }
        }
        PatternKind::Wildcard { .. } => quote! { true },
        PatternKind::Or { alts } => {
            let alt_tests = alts.iter().map(|alt| to_test(alt, occ));
            quote! { (#(#alt_tests)||*) }
        }
        PatternKind::Rest { .. } => {
            unreachable!("Rest only appears inside a Seq's element list")
        }
    }
}

/// A short, static description of a pattern variant for the runtime trace
/// breadcrumb: which per-pattern tests succeeded, in order.
fn describe(pattern: &Pattern) -> String {
    match &pattern.kind {
        PatternKind::Literal { .. } => "literal".to_string(),
        PatternKind::Seq { .. } => "seq".to_string(),
        PatternKind::SeqEnd => "seq-end".to_string(),
        PatternKind::Map { .. } => "map".to_string(),
        PatternKind::MapCrash { .. } => "map-crash".to_string(),
        PatternKind::Vector { .. } => "vector".to_string(),
        PatternKind::Guard { .. } => "guard".to_string(),
        PatternKind::Wildcard { .. } | PatternKind::Or { .. } | PatternKind::Rest { .. } => {
            "?".to_string()
        }
    }
}

/// `trace` mirrors `CompileCtx::trace`: when set, each `Switch` arm records
/// a breadcrumb before running its branch, and `Fail` reports them.
pub fn lower(node: &Node, trace: bool) -> HostExpr {
    match node {
        Node::Leaf { action, bindings } => {
            let bindings: Vec<_> = bindings
                .iter()
                .filter(|(name, _)| name != "_")
                .map(|(name, expr)| (name.clone(), expr.clone()))
                .collect();
            let body = HostExpr::Literal(quote! { #action });
            if bindings.is_empty() { body } else { HostExpr::Let(bindings, Box::new(body)) }
        }
        Node::Fail => {
            if trace {
                HostExpr::Call(quote! { ::maranget::__rt::no_match_traced(&__maranget_trace) })
            } else {
                HostExpr::Call(quote! { ::maranget::__rt::no_match() })
            }
        }
        Node::Bind { bindings, inner } => {
            let bindings: Vec<_> = bindings
                .iter()
                .filter(|(name, _)| name != "_")
                .map(|(name, expr)| (name.clone(), expr.clone()))
                .collect();
            let body = lower(inner, trace);
            if bindings.is_empty() { body } else { HostExpr::Let(bindings, Box::new(body)) }
        }
        Node::Prelude { stmt, inner } => HostExpr::Stmt(stmt.clone(), Box::new(lower(inner, trace))),
        Node::Switch { occurrence, cases, default } => {
            let arms: Vec<(TokenStream, HostExpr)> = cases
                .iter()
                .map(|(pattern, child)| {
                    let test = to_test(pattern, occurrence);
                    let body = lower(child, trace);
                    let body = if trace {
                        let note = describe(pattern);
                        HostExpr::Stmt(quote! { __maranget_trace.push(#note); }, Box::new(body))
                    } else {
                        body
                    };
                    (test, body)
                })
                .collect();
            HostExpr::Cond(arms, Box::new(lower(default, trace)))
        }
    }
}

/// Serializes a [`HostExpr`] to Rust tokens.
pub fn render(expr: &HostExpr) -> TokenStream {
    match expr {
        HostExpr::Let(bindings, inner) => {
            let lets = bindings.iter().map(|(name, value)| quote! { let #name = #value; });
            let inner = render(inner);
            quote! { { #(#lets)* #inner } }
        }
        HostExpr::Stmt(stmt, inner) => {
            let inner = render(inner);
            quote! { { #stmt #inner } }
        }
        HostExpr::If(cond, then_branch, else_branch) => {
            let then_branch = render(then_branch);
            let else_branch = render(else_branch);
            quote! { if #cond { #then_branch } else { #else_branch } }
        }
        HostExpr::Cond(arms, default) => {
            let default = render(default);
            let mut chain = quote! { { #default } };
            for (test, body) in arms.iter().rev() {
                let body = render(body);
                chain = quote! { if #test { #body } else #chain };
            }
            chain
        }
        HostExpr::Call(tokens) => tokens.clone(),
        HostExpr::Literal(tokens) => tokens.clone(),
        HostExpr::Name(ident) => quote! { #ident },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    use super::*;
    use crate::pattern::Lit;

    fn int(n: i128) -> Pattern {
        Pattern::new(PatternKind::Literal { lit: Lit::Int(n), is_local: false, expr: parse_quote!(#n) })
    }

    #[test]
    fn literal_test_compares_equality_against_the_occurrence() {
        let occ = Occurrence::plain(parse_quote!(n));
        let test = to_test(&int(5), &occ);
        assert_eq!(test.to_string(), quote! { n == 5i128 }.to_string());
    }

    #[test]
    fn seq_test_checks_non_emptiness() {
        let occ = Occurrence::plain(parse_quote!(xs));
        let pattern = Pattern::new(PatternKind::Seq { elems: vec![Pattern::wildcard()] });
        let test = to_test(&pattern, &occ);
        assert_eq!(test.to_string(), quote! { !(xs).is_empty() }.to_string());
    }

    #[test]
    fn vector_test_without_rest_checks_exact_length() {
        let occ = Occurrence::plain(parse_quote!(xs));
        let pattern = Pattern::new(PatternKind::Vector {
            elems: vec![Pattern::wildcard(), Pattern::wildcard()],
            kind: crate::pattern::VectorKind::Slice,
            min_size: 2,
            offset: 0,
            rest: false,
        });
        let test = to_test(&pattern, &occ);
        assert_eq!(test.to_string(), quote! { (xs).len() == 2usize }.to_string());
    }

    #[test]
    fn vector_test_with_rest_checks_a_minimum_length() {
        let occ = Occurrence::plain(parse_quote!(xs));
        let pattern = Pattern::new(PatternKind::Vector {
            elems: vec![Pattern::wildcard()],
            kind: crate::pattern::VectorKind::Slice,
            min_size: 1,
            offset: 0,
            rest: true,
        });
        let test = to_test(&pattern, &occ);
        assert_eq!(test.to_string(), quote! { (xs).len() >= 1usize }.to_string());
    }

    #[test]
    fn or_test_disjuncts_its_alternatives() {
        let occ = Occurrence::plain(parse_quote!(n));
        let pattern = Pattern::new(PatternKind::Or { alts: vec![int(1), int(2)] });
        let test = to_test(&pattern, &occ);
        assert_eq!(test.to_string(), quote! { (n == 1i128 || n == 2i128) }.to_string());
    }

    #[test]
    fn wildcard_test_is_unconditionally_true() {
        let occ = Occurrence::plain(parse_quote!(n));
        let test = to_test(&Pattern::wildcard(), &occ);
        assert_eq!(test.to_string(), quote! { true }.to_string());
    }

    #[test]
    fn render_leaf_emits_its_action_with_no_bindings() {
        let node = Node::Leaf { action: parse_quote!(42), bindings: vec![] };
        let expr = lower(&node, false);
        assert_eq!(render(&expr).to_string(), quote! { 42 }.to_string());
    }

    #[test]
    fn render_bind_wraps_the_action_in_let_statements() {
        let node = Node::Leaf {
            action: parse_quote!(x),
            bindings: vec![(parse_quote!(x), quote! { 7 })],
        };
        let expr = lower(&node, false);
        assert_eq!(render(&expr).to_string(), quote! { { let x = 7; x } }.to_string());
    }

    #[test]
    fn render_fail_calls_the_untraced_runtime_raiser_unless_tracing_is_on() {
        let expr = lower(&Node::Fail, false);
        assert_eq!(render(&expr).to_string(), quote! { ::maranget::__rt::no_match() }.to_string());

        let expr = lower(&Node::Fail, true);
        assert_eq!(
            render(&expr).to_string(),
            quote! { ::maranget::__rt::no_match_traced(&__maranget_trace) }.to_string()
        );
    }
}
