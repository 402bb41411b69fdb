//! Fresh occurrence-name generation.
//!
//! A thread-local counter used to mint the element/head/tail/map-key
//! occurrence names specialization introduces.

use std::cell::Cell;

use proc_macro2::Span;
use syn::Ident;

thread_local! {
    static OCC_COUNTER: Cell<usize> = const { Cell::new(0) };
}

/// Resets the counter. Call once per top-level `compile_match` invocation
/// so generated names are stable and don't grow unboundedly across calls
/// within the same process.
pub fn reset() {
    OCC_COUNTER.with(|c| c.set(0));
}

pub fn fresh_ident(prefix: &str) -> Ident {
    let id = OCC_COUNTER.with(|c| {
        let id = c.get();
        c.set(id + 1);
        id
    });
    Ident::new(&format!("__ocr_{prefix}_{id}"), Span::call_site())
}
