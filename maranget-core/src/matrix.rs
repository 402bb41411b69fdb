//! Pattern row & matrix: the working state Maranget's algorithm operates on.

use proc_macro2::TokenStream;
use syn::{Expr, Ident};

use crate::occurrence::Occurrence;
use crate::pattern::Pattern;

/// One clause's patterns plus its action and the bindings captured so far.
///
/// Invariant: `patterns.len()` equals the matrix width at all times.
/// Invariant: `bindings` is in declaration order: the order columns are
/// consumed left-to-right during specialization.
#[derive(Debug, Clone)]
pub struct PatternRow {
    pub patterns: Vec<Pattern>,
    pub action: Expr,
    pub bindings: Vec<(Ident, TokenStream)>,
}

impl PatternRow {
    pub fn new(patterns: Vec<Pattern>, action: Expr) -> Self {
        PatternRow { patterns, action, bindings: Vec::new() }
    }

    pub fn width(&self) -> usize {
        self.patterns.len()
    }

    /// Row with bindings extended by one more capture, returning a fresh
    /// row: specialization never mutates in place, each rule returns a new
    /// matrix.
    pub fn with_extra_binding(&self, name: Ident, expr: TokenStream) -> PatternRow {
        let mut bindings = self.bindings.clone();
        bindings.push((name, expr));
        PatternRow { patterns: self.patterns.clone(), action: self.action.clone(), bindings }
    }
}

/// `rows × occurrences`, `width = |occurrences| = |row.patterns|` for every
/// row. The empty matrix has dimensions `(0, 0)`.
#[derive(Debug, Clone)]
pub struct PatternMatrix {
    pub rows: Vec<PatternRow>,
    pub occurrences: Vec<Occurrence>,
}

impl PatternMatrix {
    pub fn new(rows: Vec<PatternRow>, occurrences: Vec<Occurrence>) -> Self {
        debug_assert!(
            rows.iter().all(|r| r.width() == occurrences.len()),
            "row width must equal the occurrence count"
        );
        PatternMatrix { rows, occurrences }
    }

    pub fn width(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The vertical slice of pattern `i` across all rows.
    pub fn column(&self, i: usize) -> impl Iterator<Item = &Pattern> {
        self.rows.iter().map(move |r| &r.patterns[i])
    }

    /// Swaps column `k` with column 0 in both the matrix and the
    /// occurrence vector.
    pub fn swap_columns(&mut self, k: usize) {
        self.occurrences.swap(0, k);
        for row in &mut self.rows {
            row.patterns.swap(0, k);
        }
    }
}
