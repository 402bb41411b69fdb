//! The closed pattern AST.
//!
//! Every surface form the front end recognizes is translated into one of the
//! variants here. The set is intentionally closed: adding a new kind of
//! surface syntax means adding a new [`PatternKind`] arm and a matching
//! specialization rule in [`crate::specialize`], never an open trait object.

use std::collections::BTreeSet;

use syn::Expr;

/// A normalized, comparable literal value.
///
/// Carried alongside the original `syn::Expr` so that equality/ordering
/// checks (used for constructor dedup and the total order) don't need to
/// re-tokenize or re-parse source text.
#[derive(Debug, Clone)]
pub enum Lit {
    Bool(bool),
    Int(i128),
    /// Kept as the literal's exact source text: floats aren't `Eq`, and two
    /// different textual spellings of "the same" float are treated as
    /// distinct literals, matching how the front end never folds constants.
    Float(String),
    Str(String),
    Char(char),
    /// A bare path used as a pattern: an enum variant (`Color::Red`) or a
    /// unit struct/const.
    Path(String),
}

impl PartialEq for Lit {
    fn eq(&self, other: &Self) -> bool {
        use Lit::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (Path(a), Path(b)) => a == b,
            _ => false,
        }
    }
}

impl Lit {
    /// Rank used to order literals of different kinds: non-path literals
    /// sort before paths, with natural comparison inside each kind.
    fn rank(&self) -> u8 {
        match self {
            Lit::Bool(_) => 0,
            Lit::Int(_) => 1,
            Lit::Float(_) => 2,
            Lit::Str(_) => 3,
            Lit::Char(_) => 4,
            Lit::Path(_) => 5,
        }
    }

    /// Natural ordering within the same kind; `None` when the kind has no
    /// total order of its own (shouldn't happen for the closed set above,
    /// but keeps the comparator honest).
    pub(crate) fn natural_cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Lit::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            (Char(a), Char(b)) => a.cmp(b),
            (Path(a), Path(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Which indexable-sequence family a [`PatternKind::Vector`] matches.
/// Selected per-call by `matchv!`; defaults to `Slice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VectorKind {
    #[default]
    Slice,
    Array,
    VecDeque,
}

impl VectorKind {
    /// Whether this kind needs a leading coercion bind before indexing:
    /// `VecDeque` isn't directly indexable by range the way a slice is, so
    /// occurrences project through `.make_contiguous()` first.
    pub fn needs_coerce(self) -> bool {
        matches!(self, VectorKind::VecDeque)
    }
}

/// Metadata every pattern carries: the `as`-binding capture name.
#[derive(Debug, Clone, Default)]
pub struct PatternMeta {
    pub as_name: Option<syn::Ident>,
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    /// Matches anything. `bind = None` is the default, non-capturing `_`.
    Wildcard { bind: Option<syn::Ident> },
    /// Equality match. `is_local` is set for a `^expr` pin, distinguishing
    /// a literal value from a pinned existing binding.
    Literal { lit: Lit, is_local: bool, expr: Expr },
    /// Ordered sub-pattern sequence over a cons/list-shaped occurrence.
    /// Invariant: non-empty.
    Seq { elems: Vec<Pattern> },
    /// Internal marker: a fixed-length `Seq`'s tail column, once every
    /// element has been consumed. Never produced by the front end; only
    /// `specialize_seq` introduces it, and `lower::to_test` matches it
    /// against an emptiness check rather than an equality test.
    SeqEnd,
    /// Internal marker: "the remainder of the enclosing sequence". Never
    /// reaches [`crate::compile::compile`] directly; `specialize_seq`
    /// unwraps it while splitting a `Seq` into head/tail.
    Rest { inner: Box<Pattern> },
    /// Lookup-capable match. Invariant: `entries` non-empty unless `only`
    /// is `Some(<empty>)`.
    Map {
        entries: Vec<(String, Pattern)>,
        only: Option<BTreeSet<String>>,
    },
    /// Internal: asserts a map's key set equals exactly this set.
    MapCrash { keys: BTreeSet<String> },
    /// Ordered sub-pattern sequence over an indexable occurrence.
    /// Invariant: `elems` ordered; `min_size` matches `elems.len()` unless
    /// `rest` is set, in which case `elems` holds only the fixed prefix.
    Vector {
        elems: Vec<Pattern>,
        kind: VectorKind,
        min_size: usize,
        offset: usize,
        rest: bool,
    },
    /// Matches if any alternative matches. Invariant: `alts.len() >= 1`.
    Or { alts: Vec<Pattern> },
    /// Matches if `inner` matches and every predicate holds on the
    /// occurrence.
    Guard { inner: Box<Pattern>, preds: Vec<Expr> },
}

#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub meta: PatternMeta,
}

impl Pattern {
    pub fn new(kind: PatternKind) -> Self {
        Pattern { kind, meta: PatternMeta::default() }
    }

    pub fn with_as(mut self, name: syn::Ident) -> Self {
        self.meta.as_name = Some(name);
        self
    }

    pub fn wildcard() -> Self {
        Pattern::new(PatternKind::Wildcard { bind: None })
    }

    /// True for the default, non-capturing `_` (no `:as`, no bind name).
    pub fn is_plain_wildcard(&self) -> bool {
        matches!(&self.kind, PatternKind::Wildcard { bind: None }) && self.meta.as_name.is_none()
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, PatternKind::Wildcard { .. })
    }

    /// The bound name for a named wildcard (`x` as opposed to `_`), if any.
    pub fn wildcard_bind_name(&self) -> Option<&syn::Ident> {
        match &self.kind {
            PatternKind::Wildcard { bind: Some(name) } => Some(name),
            _ => None,
        }
    }

    pub fn is_crash(&self) -> bool {
        matches!(self.kind, PatternKind::MapCrash { .. })
    }

    pub fn is_or(&self) -> bool {
        matches!(self.kind, PatternKind::Or { .. })
    }
}
