use maranget::matchv;

fn main() {
    let values: &[i128] = &[1, 2, 3];
    let _ = matchv!(LinkedList; [values];
        [[a, b, c]] => format!("{a}-{b}-{c}"),
        _ => "other".to_string(),
    );
}
