use maranget::match_patterns;

fn main() {
    let a = 1;
    let b = 2;
    let _ = match_patterns!([a, b];
        [0] => "wrong arity",
        _ => "else",
    );
}
