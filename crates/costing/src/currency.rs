//! Display formatting for amounts.

/// Render an amount as whole US dollars with thousands separators.
///
/// Missing and zero amounts both render as `N/A`. Amounts beyond the
/// integer range still print every digit.
pub fn format_usd(amount: Option<f64>) -> String {
    let amount = match amount {
        Some(a) if a != 0.0 && a.is_finite() => a,
        _ => return "N/A".to_string(),
    };

    let dollars = amount.abs().round();
    let sign = if amount < 0.0 && dollars > 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&format!("{:.0}", dollars)))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
