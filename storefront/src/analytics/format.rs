//! Display formatting for dashboard figures (Indian locale)

/// Compact rupee amount: `₹1.5L` (lakh), `₹2.3K`, or `₹950`
pub fn format_currency(amount: f64) -> String {
    if amount >= 100_000.0 {
        format!("₹{}L", fixed1(amount / 100_000.0))
    } else if amount >= 1_000.0 {
        format!("₹{}K", fixed1(amount / 1_000.0))
    } else {
        format!("₹{}", group_indian(amount))
    }
}

/// Signed percentage with one decimal: `+12.3%`, `-4.0%`
pub fn format_percentage(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{}%", fixed1(value))
}

/// One decimal place, ties rounded away from zero (`1.25` -> `1.3`).
///
/// `{:.1}` alone rounds ties to even, which would print `1.2`.
fn fixed1(value: f64) -> String {
    let rounded = (value.abs() * 10.0 + 0.5).floor() / 10.0;
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{rounded:.1}")
}

/// Group digits the Indian way (`12,34,567.5`), at most 3 fraction digits
pub fn group_indian(value: f64) -> String {
    let negative = value < 0.0;
    let rendered = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    let len = digits.len();
    for (i, d) in digits.iter().enumerate() {
        let remaining = len - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
        grouped.push(*d);
    }

    let mut out = String::new();
    if negative && (grouped != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Truncate to `max` characters, appending `...` when cut
pub fn truncate_label(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        let head: String = name.chars().take(max).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}
