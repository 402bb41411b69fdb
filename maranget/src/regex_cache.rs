//! Thread-safe cache for compiled regex patterns, avoiding recompiling the
//! same pattern on every `Like::like` call.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use regex::Regex;

fn cache() -> &'static RwLock<HashMap<String, Regex>> {
    static CACHE: OnceLock<RwLock<HashMap<String, Regex>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

pub(crate) fn get_or_compile_regex(pattern: &str) -> Option<Regex> {
    {
        let cache = cache().read().ok()?;
        if let Some(regex) = cache.get(pattern) {
            return Some(regex.clone());
        }
    }

    let regex = Regex::new(pattern).ok()?;
    if let Ok(mut cache) = cache().write() {
        cache.entry(pattern.to_string()).or_insert_with(|| regex.clone());
    }
    Some(regex)
}
