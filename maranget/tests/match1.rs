//! Single-occurrence `match1!` scenarios.

use maranget::match1;

#[test]
fn literal_with_wildcard_fallback() {
    let n = 4;
    let label = match1!(n; 0 => "zero", _ => "nonzero");
    assert_eq!(label, "nonzero");

    let n = 0;
    let label = match1!(n; 0 => "zero", _ => "nonzero");
    assert_eq!(label, "zero");
}

#[test]
fn named_wildcard_binds_the_value() {
    let n = 42;
    let doubled = match1!(n; x => x * 2);
    assert_eq!(doubled, 84);
}

#[test]
fn as_binding_captures_while_testing() {
    let n = 7;
    let result = match1!(n; (x @ 7 if x == 7) => format!("seven as {x}"), _ => "other".to_string());
    assert_eq!(result, "seven as 7");

    let n = 3;
    let result = match1!(n; (x @ 7 if x == 7) => format!("seven as {x}"), _ => "other".to_string());
    assert_eq!(result, "other");
}

#[test]
fn fizzbuzz_via_row_level_guards() {
    fn fizzbuzz(n: i128) -> String {
        match1!(n;
            _ if n % 15 == 0 => "fizzbuzz".to_string(),
            _ if n % 3 == 0 => "fizz".to_string(),
            _ if n % 5 == 0 => "buzz".to_string(),
            x => x.to_string(),
        )
    }

    assert_eq!(fizzbuzz(1), "1");
    assert_eq!(fizzbuzz(3), "fizz");
    assert_eq!(fizzbuzz(5), "buzz");
    assert_eq!(fizzbuzz(15), "fizzbuzz");
    assert_eq!(fizzbuzz(7), "7");
}

#[test]
fn or_pattern_matches_any_alternative() {
    let label = |n: i128| match1!(n; 1 | 2 | 3 => "low", 4 | 5 | 6 => "mid", _ => "high");
    assert_eq!(label(2), "low");
    assert_eq!(label(5), "mid");
    assert_eq!(label(9), "high");
}

#[test]
fn guard_with_bracketed_predicate_list() {
    let check = |n: i128| match1!(n; _x if [n > 0, n < 10] => "in range", _ => "out of range");
    assert_eq!(check(5), "in range");
    assert_eq!(check(50), "out of range");
    assert_eq!(check(-1), "out of range");
}

#[test]
fn pin_compares_against_a_local_value() {
    let expected = 9;
    let n = 9;
    let matched = match1!(n; ^expected => true, _ => false);
    assert!(matched);

    let n = 10;
    let matched = match1!(n; ^expected => true, _ => false);
    assert!(!matched);
}

#[test]
#[should_panic(expected = "no pattern matched")]
fn exhausted_match_panics() {
    let n = 5;
    let _: &str = match1!(n; 0 => "zero");
}
