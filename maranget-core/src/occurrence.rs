//! The occurrence model.
//!
//! An occurrence is a named handle plus metadata describing how to emit a
//! binding expression for it, replacing bare symbols with a struct that can
//! carry per-occurrence metadata.

use proc_macro2::TokenStream;
use syn::Ident;

/// How an element occurrence is projected out of its parent.
#[derive(Debug, Clone)]
pub enum VectorIndex {
    /// Project the `i`-th element, honoring the pattern's offset.
    Indexed { offset: usize, i: usize },
    /// A sub-slice `[start, end)` (end `None` means "to the end").
    Range { start: usize, end: Option<usize> },
}

#[derive(Debug, Clone)]
pub enum OccKind {
    /// The symbol itself is the value.
    Plain,
    /// `bind_expr` projects "head of parent" or "tail of parent"; `root`
    /// back-points to the root seq symbol.
    Seq { bind_expr: TokenStream, root: Ident },
    /// `vec_sym` is the indexable parent; `index` is either a single
    /// element projection or a sub-slice range.
    Vector { vec_sym: Ident, index: VectorIndex },
    /// `map_sym` is the lookup-capable parent; `key` is the projected key.
    /// The emitted `bind_expr` is a lookup of that key with not-found =
    /// `None`.
    Map { map_sym: Ident, key: String },
}

/// Metadata set when the user passed a raw expression as an occurrence
/// rather than a plain name; a `Bind` node introduces the `let` at the
/// right scope.
#[derive(Debug, Clone, Default)]
pub struct OccMeta {
    pub ocr_expr: Option<syn::Expr>,
}

#[derive(Debug, Clone)]
pub struct Occurrence {
    pub name: Ident,
    pub kind: OccKind,
    pub meta: OccMeta,
}

impl Occurrence {
    pub fn plain(name: Ident) -> Self {
        Occurrence { name, kind: OccKind::Plain, meta: OccMeta::default() }
    }

    pub fn with_ocr_expr(mut self, expr: syn::Expr) -> Self {
        self.meta.ocr_expr = Some(expr);
        self
    }

    /// The expression that reads the occurrence's current value, ignoring
    /// any `ocr_expr` binding (that's introduced once, up front, by a
    /// `Bind` node; see `crate::compile`).
    pub fn bind_expr(&self) -> TokenStream {
        use quote::quote;
        match &self.kind {
            OccKind::Plain => {
                let name = &self.name;
                quote! { #name }
            }
            OccKind::Seq { bind_expr, .. } => bind_expr.clone(),
            OccKind::Vector { vec_sym, index } => match index {
                VectorIndex::Indexed { offset, i } => {
                    let idx = offset + i;
                    quote! { #vec_sym[#idx] }
                }
                VectorIndex::Range { start, end: Some(end) } => {
                    quote! { #vec_sym[#start..#end] }
                }
                VectorIndex::Range { start, end: None } => {
                    quote! { #vec_sym[#start..] }
                }
            },
            OccKind::Map { map_sym, key } => {
                quote! { ::maranget::__rt::lookup(#map_sym, #key) }
            }
        }
    }
}
