//! `Like` trait scenarios (the `regex-patterns` feature).

#![cfg(feature = "regex-patterns")]

use maranget::Like;
use regex::Regex;

#[test]
fn str_like_str_pattern_runs_a_regex_match() {
    assert!("hello world".like(&"^hello"));
    assert!(!"hello world".like(&"^galaxy"));
}

#[test]
fn str_like_compiled_regex_matches_the_pattern() {
    let digits = Regex::new(r"^\d+$").unwrap();
    assert!("12345".like(&digits));
    assert!(!"12a45".like(&digits));
}

#[test]
fn string_like_pattern_string_compiles_once_and_caches() {
    let value = String::from("user-42");
    let pattern = String::from(r"^user-\d+$");
    assert!(value.like(&pattern));
    assert!(!value.like(&String::from(r"^admin-\d+$")));
}
