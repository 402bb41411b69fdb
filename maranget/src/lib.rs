//! `maranget`: a closed pattern-match compiler that lowers a fixed pattern
//! language to a Maranget-style decision tree, then to a plain Rust `if`/`match`
//! expression at macro-expansion time.
//!
//! ```
//! use maranget::match1;
//!
//! let n = 4;
//! let label = match1!(n;
//!     0 => "zero",
//!     _ => "nonzero",
//! );
//! assert_eq!(label, "nonzero");
//! ```
//!
//! This crate is the thin public shell: it re-exports the three entry-point
//! macros from `maranget-macros` and houses the runtime support the
//! generated code calls into (`__rt`, [`Lookup`], [`NoMatchError`]), plus the
//! optional regex pattern extension. The actual compiler lives in
//! `maranget-core`.

pub use maranget_macros::{match1, match_patterns, matchv};

#[cfg(feature = "regex-patterns")]
mod regex_cache;

use std::fmt;

/// A trait for pattern matching, similar to `PartialEq` but for flexible
/// matching rather than strict equality. Implemented for `String`/`&str`
/// against `&str`/regex patterns when the `regex-patterns` feature is on;
/// users may add their own implementations for other Rhs types.
pub trait Like<Rhs = Self> {
    /// Returns `true` if `self` matches the pattern `other`.
    fn like(&self, other: &Rhs) -> bool;
}

#[cfg(feature = "regex-patterns")]
mod like_impls {
    use super::Like;

    impl Like<&str> for String {
        fn like(&self, pattern: &&str) -> bool {
            crate::regex_cache::get_or_compile_regex(pattern)
                .map(|re| re.is_match(self))
                .unwrap_or(false)
        }
    }

    impl Like<String> for String {
        fn like(&self, pattern: &String) -> bool {
            self.like(&pattern.as_str())
        }
    }

    impl Like<&str> for &str {
        fn like(&self, pattern: &&str) -> bool {
            crate::regex_cache::get_or_compile_regex(pattern)
                .map(|re| re.is_match(self))
                .unwrap_or(false)
        }
    }

    impl Like<String> for &str {
        fn like(&self, pattern: &String) -> bool {
            self.like(&pattern.as_str())
        }
    }

    impl Like<regex::Regex> for String {
        fn like(&self, pattern: &regex::Regex) -> bool {
            pattern.is_match(self)
        }
    }

    impl Like<regex::Regex> for &str {
        fn like(&self, pattern: &regex::Regex) -> bool {
            pattern.is_match(self)
        }
    }
}

/// Projects a map-shaped occurrence by key. A `Map`/`MapCrash` pattern column
/// is only reachable when the occurrence's type implements this trait, so
/// the lookup protocol referenced by generated code (`::maranget::__rt::lookup`)
/// is resolved entirely at the type level: there's nothing left to check at
/// runtime beyond the key's presence.
pub trait Lookup {
    /// The type bound by a key pattern, e.g. `V` for a `HashMap<String, V>`.
    type Value;

    /// Looks up `key`, returning `None` if it isn't present.
    fn maranget_lookup(&self, key: &str) -> Option<Self::Value>;

    /// The full set of keys present, used by `:only`/`MapCrash` columns to
    /// test for an exact key-set match.
    fn maranget_keys(&self) -> Vec<&str>;
}

impl<V: Clone> Lookup for std::collections::HashMap<String, V> {
    type Value = V;

    fn maranget_lookup(&self, key: &str) -> Option<V> {
        self.get(key).cloned()
    }

    fn maranget_keys(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

impl<V: Clone> Lookup for std::collections::BTreeMap<String, V> {
    type Value = V;

    fn maranget_lookup(&self, key: &str) -> Option<V> {
        self.get(key).cloned()
    }

    fn maranget_keys(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

impl<V: Clone> Lookup for std::collections::HashMap<&str, V> {
    type Value = V;

    fn maranget_lookup(&self, key: &str) -> Option<V> {
        self.get(key).cloned()
    }

    fn maranget_keys(&self) -> Vec<&str> {
        self.keys().copied().collect()
    }
}

/// Raised by a compiled `Fail` node: every row's test came back false and
/// the value fell through the bottom of the decision tree.
///
/// Carries the runtime trace breadcrumb list when the owning macro call was
/// expanded with the `trace` feature enabled, so the message can say which
/// per-pattern tests were tried, not just that all of them failed.
#[derive(Debug)]
pub struct NoMatchError {
    trace: Option<Vec<&'static str>>,
}

impl fmt::Display for NoMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.trace {
            Some(steps) if !steps.is_empty() => {
                write!(f, "no pattern matched (tried: {})", steps.join(" -> "))
            }
            _ => write!(f, "no pattern matched"),
        }
    }
}

impl std::error::Error for NoMatchError {}

/// Runtime support called from macro-generated code. Not part of the public
/// API surface in spirit (hence the leading underscore), but it has to be
/// `pub` for `::maranget::__rt::...` paths spliced into a caller's crate to
/// resolve.
#[doc(hidden)]
pub mod __rt {
    use super::{Lookup, NoMatchError};

    pub fn lookup<M: Lookup>(map: &M, key: &str) -> Option<M::Value> {
        map.maranget_lookup(key)
    }

    pub fn keys_equal<M: Lookup>(map: &M, expected: &[&str]) -> bool {
        let mut actual = map.maranget_keys();
        let mut expected: Vec<&str> = expected.to_vec();
        actual.sort_unstable();
        expected.sort_unstable();
        actual == expected
    }

    pub fn no_match() -> ! {
        let err = NoMatchError { trace: None };
        tracing::error!(%err, "pattern match exhausted");
        panic!("{err}");
    }

    pub fn no_match_traced(trace: &[&'static str]) -> ! {
        let err = NoMatchError { trace: Some(trace.to_vec()) };
        tracing::error!(%err, "pattern match exhausted");
        panic!("{err}");
    }
}
