use maranget::match_patterns;

fn main() {
    let a = 1;
    let _ = match_patterns!([a];
        _ => "else",
        [0] => "zero",
    );
}
