//! `specialize(matrix, p)`: one rule per pattern variant.
//!
//! Every rule here returns a brand-new [`PatternMatrix`]; none mutate their
//! input, keeping the compiler purely functional over immutable data.

use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;

use crate::fresh::fresh_ident;
use crate::matrix::{PatternMatrix, PatternRow};
use crate::occurrence::{OccKind, Occurrence, VectorIndex};
use crate::ord::pattern_eq;
use crate::pattern::{Pattern, PatternKind, VectorKind};

/// Shared by every rule that consumes column 0 outright: removes the first
/// pattern, binding its `:as` name and/or named-wildcard name to the
/// dropped occurrence's current value.
fn drop_nth_bind(row: &PatternRow, occ: &Occurrence) -> PatternRow {
    let dropped = &row.patterns[0];
    let mut bindings = row.bindings.clone();
    if let Some(as_name) = &dropped.meta.as_name {
        bindings.push((as_name.clone(), occ.bind_expr()));
    }
    if let Some(name) = dropped.wildcard_bind_name() {
        bindings.push((name.clone(), occ.bind_expr()));
    }
    PatternRow {
        patterns: row.patterns[1..].to_vec(),
        action: row.action.clone(),
        bindings,
    }
}

/// `ctor = None` specializes by Wildcard (the default matrix);
/// `ctor = Some(c)` specializes by a specific Literal constructor. Either
/// way, a wildcard row always matches (it absorbs every constructor).
pub fn specialize_default(matrix: &PatternMatrix, ctor: Option<&Pattern>) -> PatternMatrix {
    let occ0 = &matrix.occurrences[0];
    let rows = matrix
        .rows
        .iter()
        .filter(|row| {
            let first = &row.patterns[0];
            match ctor {
                None => first.is_wildcard(),
                Some(c) => first.is_wildcard() || pattern_eq(first, c),
            }
        })
        .map(|row| drop_nth_bind(row, occ0))
        .collect();
    PatternMatrix::new(rows, matrix.occurrences[1..].to_vec())
}

/// Terminates a fixed-length `Seq`'s head/tail recursion: the tail column
/// is switched on this instead of running out of sub-patterns.
fn seq_end() -> Pattern {
    Pattern::new(PatternKind::SeqEnd)
}

/// Splits each matching row's first pattern into head/tail.
pub fn specialize_seq(matrix: &PatternMatrix) -> PatternMatrix {
    let occ0 = &matrix.occurrences[0];
    let parent_expr = occ0.bind_expr();

    let mut rows = Vec::new();
    for row in &matrix.rows {
        let first = &row.patterns[0];
        let is_seq = matches!(first.kind, PatternKind::Seq { .. });
        if !(first.is_wildcard() || is_seq) {
            continue;
        }
        let mut base = drop_nth_bind(row, occ0);
        let (head, tail) = match &first.kind {
            PatternKind::Seq { elems } => {
                let head = elems[0].clone();
                let tail = if elems.len() == 1 {
                    seq_end()
                } else if let PatternKind::Rest { inner } = &elems[1].kind {
                    (**inner).clone()
                } else {
                    Pattern::new(PatternKind::Seq { elems: elems[1..].to_vec() })
                };
                (head, tail)
            }
            _ => (Pattern::wildcard(), Pattern::wildcard()),
        };
        base.patterns.insert(0, tail);
        base.patterns.insert(0, head);
        rows.push(base);
    }

    let root = match &occ0.kind {
        OccKind::Seq { root, .. } => root.clone(),
        _ => occ0.name.clone(),
    };
    let head_occ = Occurrence {
        name: fresh_ident("head"),
        // Parenthesized: `parent_expr` may itself already be a reference
        // expression (`&xs[1..]` from an enclosing tail), and splicing an
        // index directly after it would let `&` creep over the whole
        // chain instead of binding to just its own slice.
        kind: OccKind::Seq { bind_expr: quote! { (#parent_expr)[0] }, root: root.clone() },
        meta: Default::default(),
    };
    let tail_occ = Occurrence {
        name: fresh_ident("tail"),
        // Referenced, unlike the head: `parent_expr[1..]` is an unsized
        // `[T]` and can't be bound to a name on its own.
        kind: OccKind::Seq { bind_expr: quote! { &(#parent_expr)[1..] }, root },
        meta: Default::default(),
    };

    let mut occurrences = vec![head_occ, tail_occ];
    occurrences.extend(matrix.occurrences[1..].iter().cloned());
    PatternMatrix::new(rows, occurrences)
}

/// Expands a lookup-capable column into one sub-column per key
/// mentioned across the retained rows.
pub fn specialize_map(matrix: &PatternMatrix) -> (PatternMatrix, TokenStream) {
    let occ0 = &matrix.occurrences[0];
    let map_expr = occ0.bind_expr();
    let map_sym = fresh_ident("map");

    let retained: Vec<&PatternRow> = matrix
        .rows
        .iter()
        .filter(|row| {
            let first = &row.patterns[0];
            first.is_wildcard() || matches!(first.kind, PatternKind::Map { .. })
        })
        .collect();

    let mut all_keys: BTreeSet<String> = BTreeSet::new();
    for row in &retained {
        if let PatternKind::Map { entries, only } = &row.patterns[0].kind {
            all_keys.extend(entries.iter().map(|(k, _)| k.clone()));
            if let Some(only) = only {
                all_keys.extend(only.iter().cloned());
            }
        }
    }
    let all_keys: Vec<String> = all_keys.into_iter().collect();

    let mut rows = Vec::new();
    for row in retained {
        let first = &row.patterns[0];
        let mut base = drop_nth_bind(row, occ0);
        let sub: Vec<Pattern> = match &first.kind {
            PatternKind::Map { entries, only: None } => all_keys
                .iter()
                .map(|k| {
                    entries
                        .iter()
                        .find(|(ek, _)| ek == k)
                        .map(|(_, p)| p.clone())
                        .unwrap_or_else(Pattern::wildcard)
                })
                .collect(),
            PatternKind::Map { entries, only: Some(only) } => all_keys
                .iter()
                .map(|k| {
                    if let Some((_, p)) = entries.iter().find(|(ek, _)| ek == k) {
                        p.clone()
                    } else if only.contains(k) {
                        Pattern::wildcard()
                    } else {
                        Pattern::new(PatternKind::MapCrash { keys: only.clone() })
                    }
                })
                .collect(),
            _ => all_keys.iter().map(|_| Pattern::wildcard()).collect(),
        };
        // Prepend in reverse so column order matches key order.
        for p in sub.into_iter().rev() {
            base.patterns.insert(0, p);
        }
        rows.push(base);
    }

    let mut occurrences: Vec<Occurrence> = all_keys
        .iter()
        .map(|key| Occurrence {
            name: fresh_ident("map_val"),
            kind: OccKind::Map { map_sym: map_sym.clone(), key: key.clone() },
            meta: Default::default(),
        })
        .collect();
    occurrences.extend(matrix.occurrences[1..].iter().cloned());

    // `map_sym` must be in scope before any per-key lookup occurrence is
    // read, which can happen as soon as the Switch for this sub-matrix is
    // built; too early for a Leaf-only row binding. The caller wraps the
    // Switch in a `Bind` using this pre-bind, the same mechanism used for
    // `ocr_expr` occurrences and vector coercion.
    let pre_bind = quote! { let #map_sym = &#map_expr; };

    (PatternMatrix::new(rows, occurrences), pre_bind)
}

/// Retains only rows whose `MapCrash` key set matches exactly;
/// collapses to at most one action (a crash test has no further columns
/// to disambiguate with).
pub fn specialize_mapcrash(matrix: &PatternMatrix, keys: &BTreeSet<String>) -> PatternMatrix {
    let matched = matrix.rows.iter().find(|row| {
        matches!(&row.patterns[0].kind, PatternKind::MapCrash { keys: k } if k == keys)
    });
    let rows = match matched {
        Some(row) => vec![PatternRow {
            patterns: Vec::new(),
            action: row.action.clone(),
            bindings: row.bindings.clone(),
        }],
        None => Vec::new(),
    };
    PatternMatrix::new(rows, matrix.occurrences[1..].to_vec())
}

/// Folds `(has_rest, min_size)` across every matching row, then
/// splits each row's first pattern into fixed-size (or prefix+remainder)
/// sub-patterns accordingly.
pub fn specialize_vector(matrix: &PatternMatrix) -> (PatternMatrix, TokenStream) {
    let occ0 = &matrix.occurrences[0];
    let vec_expr = occ0.bind_expr();

    let retained: Vec<&PatternRow> = matrix
        .rows
        .iter()
        .filter(|row| {
            let first = &row.patterns[0];
            first.is_wildcard() || matches!(first.kind, PatternKind::Vector { .. })
        })
        .collect();

    let mut has_rest = false;
    let mut min_size: Option<usize> = None;
    let mut kind = VectorKind::Slice;
    let mut offset = 0usize;
    for row in &retained {
        if let PatternKind::Vector { rest, min_size: sz, kind: k, offset: off, .. } =
            &row.patterns[0].kind
        {
            has_rest |= *rest;
            min_size = Some(min_size.map_or(*sz, |m: usize| m.min(*sz)));
            kind = *k;
            offset = *off;
        }
    }
    let min_size = min_size.unwrap_or(0);

    // Every occurrence in this sub-matrix indexes through `vec_sym`; it
    // always needs a binding (not only when coercion applies), so the
    // per-occurrence index expressions never depend on whether `vec_expr`
    // itself is a place expression.
    let vec_sym = fresh_ident("vec");
    let coerce_bind = if kind.needs_coerce() {
        quote! { let mut #vec_sym = #vec_expr; let #vec_sym = #vec_sym.make_contiguous(); }
    } else {
        quote! { let #vec_sym = &#vec_expr; }
    };

    let mut rows = Vec::new();
    for row in retained {
        let first = &row.patterns[0];
        let mut base = drop_nth_bind(row, occ0);
        // `elems` holds the declared prefix (plus a trailing remainder
        // sub-pattern when this row's own pattern has `rest = true`); the
        // folded `min_size` is never larger than any retained row's own
        // size, so truncating to it is always in-bounds.
        let prefix: Vec<Pattern> = match &first.kind {
            PatternKind::Vector { elems, .. } => elems[..min_size.min(elems.len())].to_vec(),
            _ => (0..min_size).map(|_| Pattern::wildcard()).collect(),
        };
        if has_rest {
            let remainder = match &first.kind {
                PatternKind::Vector { rest: true, elems, .. } if elems.len() > min_size => {
                    elems[min_size].clone()
                }
                PatternKind::Vector { rest: true, .. } => Pattern::wildcard(),
                PatternKind::Vector { rest: false, kind, .. } => {
                    // This row's own pattern has no rest, but a sibling row
                    // does; folding them together only admits rows whose
                    // remainder is exactly empty.
                    Pattern::new(PatternKind::Vector {
                        elems: Vec::new(),
                        kind: *kind,
                        min_size: 0,
                        offset: 0,
                        rest: false,
                    })
                }
                _ => Pattern::wildcard(),
            };
            let mut sub = prefix;
            sub.push(remainder);
            for p in sub.into_iter().rev() {
                base.patterns.insert(0, p);
            }
        } else {
            for p in prefix.into_iter().rev() {
                base.patterns.insert(0, p);
            }
        }
        rows.push(base);
    }

    // The prefix is `min_size` separate sub-patterns (one per position, just
    // like the no-rest case below), so it needs one fresh element occurrence
    // per position, not a single combined slice occurrence; otherwise a
    // prefix pattern like `first` would bind to a length-`min_size` slice
    // instead of its own element, and row width would outrun the occurrence
    // count whenever `min_size > 1`. Only the true remainder, whose length
    // isn't known, gets a `right` range occurrence.
    let mut occurrences: Vec<Occurrence> = (0..min_size)
        .map(|i| Occurrence {
            name: fresh_ident("elem"),
            kind: OccKind::Vector { vec_sym: vec_sym.clone(), index: VectorIndex::Indexed { offset, i } },
            meta: Default::default(),
        })
        .collect();
    if has_rest {
        occurrences.push(Occurrence {
            name: fresh_ident("right"),
            kind: OccKind::Vector {
                vec_sym: vec_sym.clone(),
                index: VectorIndex::Range { start: min_size, end: None },
            },
            meta: Default::default(),
        });
    }
    occurrences.extend(matrix.occurrences[1..].iter().cloned());

    (PatternMatrix::new(rows, occurrences), coerce_bind)
}

/// Expands every `Or` row (whose first pattern is the Or being
/// normalized) into one row per alternative; wildcard rows pass through.
pub fn specialize_or(matrix: &PatternMatrix, target: &Pattern) -> PatternMatrix {
    let mut rows = Vec::new();
    for row in &matrix.rows {
        let first = &row.patterns[0];
        if first.is_wildcard() {
            rows.push(row.clone());
            continue;
        }
        if pattern_eq(first, target) {
            if let PatternKind::Or { alts } = &first.kind {
                for alt in alts {
                    let mut new_row = row.clone();
                    // The alternative inherits the Or's own `:as` capture,
                    // if any, since an Or pattern is a pure alternation
                    // wrapper: `:as` is attached to the Or itself, not to
                    // each alternative.
                    let mut alt = alt.clone();
                    if alt.meta.as_name.is_none() {
                        alt.meta.as_name = first.meta.as_name.clone();
                    }
                    new_row.patterns[0] = alt;
                    rows.push(new_row);
                }
                continue;
            }
        }
        rows.push(row.clone());
    }
    PatternMatrix::new(rows, matrix.occurrences.clone())
}

/// Retains matching rows; a `Guard` row has its first pattern
/// replaced by the guard's inner pattern in the same slot. The guard's
/// predicates are tested by the `Switch` case, not by specialization.
pub fn specialize_guard(matrix: &PatternMatrix, ctor: &Pattern) -> PatternMatrix {
    let rows = matrix
        .rows
        .iter()
        .filter_map(|row| {
            let first = &row.patterns[0];
            if first.is_wildcard() {
                return Some(row.clone());
            }
            if pattern_eq(first, ctor) {
                if let PatternKind::Guard { inner, .. } = &first.kind {
                    let mut new_row = row.clone();
                    new_row.patterns[0] = (**inner).clone();
                    return Some(new_row);
                }
            }
            None
        })
        .collect();
    PatternMatrix::new(rows, matrix.occurrences.clone())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    use super::*;

    fn row(patterns: Vec<Pattern>) -> PatternRow {
        PatternRow::new(patterns, parse_quote!(()))
    }

    fn seq(elems: Vec<Pattern>) -> Pattern {
        Pattern::new(PatternKind::Seq { elems })
    }

    fn rest(inner: Pattern) -> Pattern {
        Pattern::new(PatternKind::Rest { inner: Box::new(inner) })
    }

    fn vector(elems: Vec<Pattern>, min_size: usize, rest: bool) -> Pattern {
        Pattern::new(PatternKind::Vector { elems, kind: VectorKind::Slice, min_size, offset: 0, rest })
    }

    #[test]
    fn specialize_seq_binds_the_tail_as_a_reference_to_an_unsized_slice() {
        let occ = Occurrence::plain(parse_quote!(xs));
        let matrix = PatternMatrix::new(
            vec![row(vec![seq(vec![Pattern::wildcard(), rest(Pattern::wildcard())])])],
            vec![occ],
        );
        let out = specialize_seq(&matrix);
        let tail_occ = &out.occurrences[1];
        assert_eq!(tail_occ.bind_expr().to_string(), quote! { &(xs)[1..] }.to_string());
    }

    #[test]
    fn specialize_seq_produces_one_head_and_one_tail_occurrence() {
        let occ = Occurrence::plain(parse_quote!(xs));
        let matrix = PatternMatrix::new(
            vec![row(vec![seq(vec![Pattern::wildcard(), rest(Pattern::wildcard())])])],
            vec![occ],
        );
        let out = specialize_seq(&matrix);
        assert_eq!(out.occurrences.len(), 2);
        assert_eq!(out.rows[0].patterns.len(), 2);
    }

    #[test]
    fn specialize_vector_gives_each_prefix_element_its_own_scalar_occurrence() {
        let occ = Occurrence::plain(parse_quote!(xs));
        let pattern = vector(vec![Pattern::wildcard(), Pattern::wildcard()], 2, true);
        let matrix = PatternMatrix::new(vec![row(vec![pattern])], vec![occ]);
        let (out, _) = specialize_vector(&matrix);

        // min_size = 2 prefix elements plus one remainder occurrence.
        assert_eq!(out.occurrences.len(), 3);
        assert_eq!(out.rows[0].patterns.len(), 3);

        let vec_sym = match &out.occurrences[0].kind {
            OccKind::Vector { vec_sym, .. } => vec_sym.clone(),
            _ => panic!("expected a Vector occurrence"),
        };
        let first = &out.occurrences[0];
        assert_eq!(first.bind_expr().to_string(), quote! { #vec_sym[0usize] }.to_string());
        let second = &out.occurrences[1];
        assert_eq!(second.bind_expr().to_string(), quote! { #vec_sym[1usize] }.to_string());
    }

    #[test]
    fn specialize_vector_without_rest_matches_row_width_to_occurrence_count() {
        let occ = Occurrence::plain(parse_quote!(xs));
        let pattern = vector(vec![Pattern::wildcard(), Pattern::wildcard(), Pattern::wildcard()], 3, false);
        let matrix = PatternMatrix::new(vec![row(vec![pattern])], vec![occ]);
        let (out, _) = specialize_vector(&matrix);

        assert_eq!(out.occurrences.len(), 3);
        assert_eq!(out.rows[0].patterns.len(), 3);
    }

    #[test]
    fn specialize_map_expands_one_sub_column_per_key_mentioned_across_rows() {
        let occ = Occurrence::plain(parse_quote!(m));
        let entry_row = Pattern::new(PatternKind::Map {
            entries: vec![("name".to_string(), Pattern::wildcard())],
            only: None,
        });
        let matrix = PatternMatrix::new(vec![row(vec![entry_row])], vec![occ]);
        let (out, pre_bind) = specialize_map(&matrix);

        assert_eq!(out.occurrences.len(), 1);
        assert!(pre_bind.to_string().contains("let"));
        match &out.occurrences[0].kind {
            OccKind::Map { key, .. } => assert_eq!(key, "name"),
            _ => panic!("expected a Map occurrence"),
        }
    }

    #[test]
    fn specialize_map_synthesizes_mapcrash_for_a_closed_row_missing_a_sibling_key() {
        let occ = Occurrence::plain(parse_quote!(m));
        let mut only = BTreeSet::new();
        only.insert("a".to_string());
        let closed_row = Pattern::new(PatternKind::Map { entries: vec![], only: Some(only) });
        let open_row = Pattern::new(PatternKind::Map {
            entries: vec![("b".to_string(), Pattern::wildcard())],
            only: None,
        });
        let matrix =
            PatternMatrix::new(vec![row(vec![closed_row]), row(vec![open_row])], vec![occ]);
        let (out, _) = specialize_map(&matrix);

        // Two keys mentioned overall ("a" via `only`, "b" via the sibling row).
        assert_eq!(out.occurrences.len(), 2);
        let closed_sub_patterns = &out.rows[0].patterns;
        assert!(closed_sub_patterns.iter().any(|p| p.is_crash()));
    }
}
