//! The matrix compiler: `compile(matrix) -> Node`, Maranget's core
//! algorithm (column scoring, constructor enumeration, recursive
//! specialization) driven by the rules in [`crate::specialize`].

use crate::ctx::CompileCtx;
use crate::dag::Node;
use crate::matrix::PatternMatrix;
use crate::ord::sort_constructors;
use crate::pattern::{Pattern, PatternKind};
use crate::specialize::{
    specialize_default, specialize_guard, specialize_map, specialize_mapcrash, specialize_or,
    specialize_seq, specialize_vector,
};

/// A column's per-row classification while scoring it for selection.
#[derive(PartialEq, Eq, Clone, Copy)]
enum Cell {
    /// A `MapCrash` test: never absorbs a constructor, but never competes
    /// with one either; an all-crash column forces a pick (score `-1`)
    /// rather than being skipped outright.
    Crash,
    /// The first non-wildcard pattern seen so far in this column.
    Useful,
    /// A wildcard, or a non-wildcard that a wildcard above it has already
    /// made unreachable.
    Shadowed,
}

/// Scores every column and returns the index of the best one, ties broken
/// by lowest index. The sentinel starting score is `-2` so that even an
/// all-crash column (`score == -1`) beats never picking a column.
fn choose_column(matrix: &PatternMatrix) -> usize {
    let mut best_col = 0;
    let mut best_score: i64 = -2;

    for j in 0..matrix.width() {
        let mut shadowed = false;
        let mut any_crash = false;
        let mut useful_count = 0i64;
        for pattern in matrix.column(j) {
            let cell = if pattern.is_crash() {
                Cell::Crash
            } else if pattern.is_wildcard() || shadowed {
                Cell::Shadowed
            } else {
                Cell::Useful
            };
            match cell {
                Cell::Crash => any_crash = true,
                Cell::Useful => useful_count += 1,
                Cell::Shadowed => {}
            }
            if pattern.is_wildcard() {
                shadowed = true;
            }
        }
        let score = if any_crash { -1 } else { useful_count };
        if score > best_score {
            best_score = score;
            best_col = j;
        }
    }
    best_col
}

/// Expands every `Or` pattern out of column 0 before constructors are
/// enumerated there.
fn normalize_column_zero(mut matrix: PatternMatrix) -> PatternMatrix {
    loop {
        let target = matrix.rows.iter().find_map(|row| {
            let first = &row.patterns[0];
            if first.is_or() { Some(first.clone()) } else { None }
        });
        match target {
            Some(target) => matrix = specialize_or(&matrix, &target),
            None => return matrix,
        }
    }
}

/// Every distinct non-wildcard pattern in column 0, in total-order.
fn constructor_set(matrix: &PatternMatrix) -> Vec<Pattern> {
    let ctors: Vec<Pattern> = matrix
        .column(0)
        .filter(|p| !p.is_wildcard())
        .cloned()
        .collect();
    sort_constructors(ctors)
}

/// Specializes by one enumerated constructor and compiles the result,
/// threading through the pre-bind a `Map`/`Vector` rule needs wired ahead
/// of its sub-occurrences.
fn child_for_constructor(ctor: &Pattern, matrix: &PatternMatrix, ctx: &mut CompileCtx) -> Node {
    match &ctor.kind {
        PatternKind::Seq { .. } => compile(&specialize_seq(matrix), ctx),
        PatternKind::Map { .. } => {
            let (specialized, pre_bind) = specialize_map(matrix);
            let inner = compile(&specialized, ctx);
            Node::Prelude { stmt: pre_bind, inner: Box::new(inner) }
        }
        PatternKind::MapCrash { keys } => compile(&specialize_mapcrash(matrix, keys), ctx),
        PatternKind::Vector { .. } => {
            let (specialized, coerce_bind) = specialize_vector(matrix);
            let inner = compile(&specialized, ctx);
            Node::Prelude { stmt: coerce_bind, inner: Box::new(inner) }
        }
        PatternKind::Guard { .. } => compile(&specialize_guard(matrix, ctor), ctx),
        // Literal, and anything else without a bespoke rule, uses the
        // default specialization.
        _ => compile(&specialize_default(matrix, Some(ctor)), ctx),
    }
}

pub fn compile(matrix: &PatternMatrix, ctx: &mut CompileCtx) -> Node {
    // No rows: every row above has already failed to match.
    if matrix.is_empty() {
        ctx.warn_inexhaustive_once();
        return Node::Fail;
    }

    let first = &matrix.rows[0];

    // The first row is empty: it matches unconditionally.
    if first.width() == 0 {
        return Node::Leaf { action: first.action.clone(), bindings: first.bindings.clone() };
    }

    // The first row is all wildcards: it matches unconditionally once its
    // named wildcards are bound.
    if first.patterns.iter().all(|p| p.is_wildcard()) {
        let mut bindings = first.bindings.clone();
        for (pattern, occ) in first.patterns.iter().zip(&matrix.occurrences) {
            if let Some(name) = pattern.wildcard_bind_name() {
                bindings.push((name.clone(), occ.bind_expr()));
            }
        }
        return Node::Leaf { action: first.action.clone(), bindings };
    }

    // Otherwise: pick a column and branch on it.
    let chosen = choose_column(matrix);

    let mut matrix = matrix.clone();
    if chosen != 0 {
        matrix.swap_columns(chosen);
        return compile(&matrix, ctx);
    }

    matrix = normalize_column_zero(matrix);

    // Occurrences carrying a raw `ocr_expr` (the caller passed an
    // expression rather than a bare name) get bound once, right here,
    // ahead of the Switch that reads them, then cleared so no deeper
    // recursive call re-evaluates the original expression again.
    let ocr_bindings: Vec<_> = matrix
        .occurrences
        .iter()
        .filter_map(|occ| {
            occ.meta.ocr_expr.as_ref().map(|e| (occ.name.clone(), quote::quote! { #e }))
        })
        .collect();
    if !ocr_bindings.is_empty() {
        for occ in &mut matrix.occurrences {
            occ.meta.ocr_expr = None;
        }
    }

    let ctors = constructor_set(&matrix);
    let rows_before = matrix.rows.len();

    let cases: Vec<(Pattern, Node)> = ctors
        .iter()
        .map(|ctor| (ctor.clone(), child_for_constructor(ctor, &matrix, ctx)))
        .collect();

    let default_matrix = specialize_default(&matrix, None);
    ctx.record_trace(0, rows_before, default_matrix.rows.len());
    let default = if default_matrix.is_empty() {
        ctx.warn_inexhaustive_once();
        Node::Fail
    } else {
        compile(&default_matrix, ctx)
    };

    let occurrence = matrix.occurrences[0].clone();
    let switch = Node::Switch { occurrence, cases, default: Box::new(default) };

    if ocr_bindings.is_empty() {
        switch
    } else {
        Node::Bind { bindings: ocr_bindings, inner: Box::new(switch) }
    }
}
