/// Group the integer digits of a non-negative decimal string: "1234.56" -> "1,234.56".
fn group_thousands(digits: &str) -> String {
    let (int_part, dec_part) = digits.split_once('.').unwrap_or((digits, ""));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if !dec_part.is_empty() {
        grouped.push('.');
        grouped.push_str(dec_part);
    }
    grouped
}

/// Dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let body = group_thousands(&format!("{:.2}", val.abs()));
    // -0.001 rounds to $0.00, not -$0.00
    if val < 0.0 && body != "0.00" {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

pub fn percent(val: f64) -> String {
    format!("{val:.1}%")
}
