//! `matchv!` scenarios: vector patterns over slices, arrays, and `VecDeque`.

use std::collections::VecDeque;

use maranget::matchv;

#[test]
fn slice_vector_pattern_matches_fixed_arity() {
    let triple: &[i128] = &[1, 2, 3];
    let label = matchv!(Slice; [triple];
        [[a, b, c]] => format!("{a}-{b}-{c}"),
        [_] => "other".to_string(),
    );
    assert_eq!(label, "1-2-3");

    let pair: &[i128] = &[1, 2];
    let label = matchv!(Slice; [pair];
        [[a, b, c]] => format!("{a}-{b}-{c}"),
        [_] => "other".to_string(),
    );
    assert_eq!(label, "other");
}

#[test]
fn slice_vector_pattern_with_rest_matches_any_longer_length() {
    let values: &[i128] = &[10, 20, 30, 40];
    let label = matchv!(Slice; [values];
        [[first, ..]] => format!("starts with {first}"),
        [_] => "empty".to_string(),
    );
    assert_eq!(label, "starts with 10");

    let values: &[i128] = &[];
    let label = matchv!(Slice; [values];
        [[first, ..]] => format!("starts with {first}"),
        [_] => "empty".to_string(),
    );
    assert_eq!(label, "empty");
}

#[test]
fn slice_vector_pattern_with_multi_element_prefix_and_rest() {
    let values: &[i128] = &[1, 2, 3, 4, 5];
    let label = matchv!(Slice; [values];
        [[a, b, ..]] => format!("{a},{b} then more"),
        [_] => "other".to_string(),
    );
    assert_eq!(label, "1,2 then more");

    let values: &[i128] = &[1];
    let label = matchv!(Slice; [values];
        [[a, b, ..]] => format!("{a},{b} then more"),
        [_] => "other".to_string(),
    );
    assert_eq!(label, "other");
}

#[test]
fn vecdeque_vector_pattern_matches_after_coercion() {
    let mut dq: VecDeque<i128> = VecDeque::new();
    dq.push_back(1);
    dq.push_back(2);
    dq.push_front(0);

    let label = matchv!(VecDeque; [dq];
        [[a, b, c]] => format!("{a}-{b}-{c}"),
        [_] => "other".to_string(),
    );
    assert_eq!(label, "0-1-2");
}
