//! The total order on patterns used to group a column's constructors
//! deterministically.

use quote::ToTokens;

use crate::pattern::{Pattern, PatternKind};

/// Incomparable patterns are treated as distinct constructors for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternOrd {
    Lt,
    Eq,
    Gt,
    Incomparable,
}

impl PatternOrd {
    pub fn is_eq(self) -> bool {
        self == PatternOrd::Eq
    }
}

fn preds_key(preds: &[syn::Expr]) -> std::collections::BTreeSet<String> {
    preds
        .iter()
        .map(|e| e.to_token_stream().to_string())
        .collect()
}

/// Compares two patterns under the total order used for constructor
/// grouping and column sorting.
pub fn pattern_cmp(a: &Pattern, b: &Pattern) -> PatternOrd {
    let a_wild = a.is_wildcard();
    let b_wild = b.is_wildcard();

    // Wildcard is greatest; any non-wildcard < wildcard.
    match (a_wild, b_wild) {
        (true, true) => return PatternOrd::Eq,
        (true, false) => return PatternOrd::Gt,
        (false, true) => return PatternOrd::Lt,
        (false, false) => {}
    }

    let a_lit = matches!(a.kind, PatternKind::Literal { .. });
    let b_lit = matches!(b.kind, PatternKind::Literal { .. });

    // Literal < any non-literal, non-wildcard.
    match (a_lit, b_lit) {
        (true, false) => return PatternOrd::Lt,
        (false, true) => return PatternOrd::Gt,
        (true, true) => {
            let (PatternKind::Literal { lit: la, .. }, PatternKind::Literal { lit: lb, .. }) =
                (&a.kind, &b.kind)
            else {
                unreachable!()
            };
            return if la == lb {
                PatternOrd::Eq
            } else {
                match la.natural_cmp(lb) {
                    std::cmp::Ordering::Less => PatternOrd::Lt,
                    std::cmp::Ordering::Equal => PatternOrd::Eq,
                    std::cmp::Ordering::Greater => PatternOrd::Gt,
                }
            };
        }
        (false, false) => {}
    }

    match (&a.kind, &b.kind) {
        // Two Guards: equal iff their predicate sets are equal.
        (
            PatternKind::Guard { preds: pa, .. },
            PatternKind::Guard { preds: pb, .. },
        ) => {
            if preds_key(pa) == preds_key(pb) {
                PatternOrd::Eq
            } else {
                PatternOrd::Incomparable
            }
        }
        // Two Ors: equal iff element-wise pattern-equal.
        (PatternKind::Or { alts: aa }, PatternKind::Or { alts: ab }) => {
            if aa.len() == ab.len()
                && aa.iter().zip(ab).all(|(x, y)| pattern_cmp(x, y).is_eq())
            {
                PatternOrd::Eq
            } else {
                PatternOrd::Incomparable
            }
        }
        // MapCrash equality is keyed on the exact key set: different key
        // sets must stay distinct constructors.
        (PatternKind::MapCrash { keys: ka }, PatternKind::MapCrash { keys: kb }) => {
            if ka == kb {
                PatternOrd::Eq
            } else {
                PatternOrd::Incomparable
            }
        }
        // Different variants: incomparable (distinct).
        _ if std::mem::discriminant(&a.kind) != std::mem::discriminant(&b.kind) => {
            PatternOrd::Incomparable
        }
        // Same-variant default: equal. Seq/Map/Vector (and Rest, which
        // never reaches here) fold their shape differences inside
        // specialize() itself rather than needing separate constructor
        // branches; see DESIGN.md for the Vector open-question writeup.
        _ => PatternOrd::Eq,
    }
}

pub fn pattern_eq(a: &Pattern, b: &Pattern) -> bool {
    pattern_cmp(a, b).is_eq()
}

/// Sorts a constructor set by the total order, deduplicating by
/// pattern-equality, breaking ties (including `Incomparable`, which cannot
/// itself yield an order) by insertion order: a stable sort already gives
/// us that for equal keys.
pub fn sort_constructors(mut ctors: Vec<Pattern>) -> Vec<Pattern> {
    let mut out: Vec<Pattern> = Vec::new();
    for ctor in ctors.drain(..) {
        if !out.iter().any(|seen| pattern_eq(seen, &ctor)) {
            out.push(ctor);
        }
    }
    out.sort_by(|a, b| match pattern_cmp(a, b) {
        PatternOrd::Lt => std::cmp::Ordering::Less,
        PatternOrd::Gt => std::cmp::Ordering::Greater,
        PatternOrd::Eq | PatternOrd::Incomparable => std::cmp::Ordering::Equal,
    });
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    use super::*;
    use crate::pattern::Lit;

    fn int(n: i128) -> Pattern {
        Pattern::new(PatternKind::Literal { lit: Lit::Int(n), is_local: false, expr: parse_quote!(#n) })
    }

    fn keys(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn wildcard_is_greatest() {
        assert_eq!(pattern_cmp(&Pattern::wildcard(), &Pattern::wildcard()), PatternOrd::Eq);
        assert_eq!(pattern_cmp(&Pattern::wildcard(), &int(1)), PatternOrd::Gt);
        assert_eq!(pattern_cmp(&int(1), &Pattern::wildcard()), PatternOrd::Lt);
    }

    #[test]
    fn literals_order_naturally_within_kind() {
        assert_eq!(pattern_cmp(&int(1), &int(2)), PatternOrd::Lt);
        assert_eq!(pattern_cmp(&int(2), &int(1)), PatternOrd::Gt);
        assert_eq!(pattern_cmp(&int(5), &int(5)), PatternOrd::Eq);
    }

    #[test]
    fn or_patterns_compare_by_alternatives() {
        let a = Pattern::new(PatternKind::Or { alts: vec![int(1), int(2)] });
        let b = Pattern::new(PatternKind::Or { alts: vec![int(1), int(2)] });
        let c = Pattern::new(PatternKind::Or { alts: vec![int(1), int(3)] });
        assert_eq!(pattern_cmp(&a, &b), PatternOrd::Eq);
        assert_eq!(pattern_cmp(&a, &c), PatternOrd::Incomparable);
    }

    #[test]
    fn mapcrash_equality_is_keyed_on_key_set() {
        let a = Pattern::new(PatternKind::MapCrash { keys: keys(&["a", "b"]) });
        let b = Pattern::new(PatternKind::MapCrash { keys: keys(&["a", "b"]) });
        let c = Pattern::new(PatternKind::MapCrash { keys: keys(&["a"]) });
        assert_eq!(pattern_cmp(&a, &b), PatternOrd::Eq);
        assert_eq!(pattern_cmp(&a, &c), PatternOrd::Incomparable);
    }

    #[test]
    fn sort_constructors_dedups_and_orders() {
        let ctors = vec![int(3), int(1), int(3), Pattern::wildcard(), int(2)];
        let sorted = sort_constructors(ctors);
        let values: Vec<i128> = sorted
            .iter()
            .filter_map(|p| match &p.kind {
                PatternKind::Literal { lit: Lit::Int(n), .. } => Some(*n),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
