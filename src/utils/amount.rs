//! Currency amount helpers.

/// Won per eok (억).
pub const WON_PER_EOK: i64 = 100_000_000;

/// Parse an amount that may carry thousands separators.
pub fn parse_amount(value: &str) -> Option<i64> {
    let digits = value.replace(',', "");
    let digits = digits.trim();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Group an integer with commas, e.g. `1000000` → `1,000,000`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Best-effort reformat of a currency field; unparsable input passes through.
pub fn format_amount(value: &str) -> String {
    match parse_amount(value) {
        Some(n) => group_thousands(n),
        None => value.to_string(),
    }
}

/// Convert an amount given in eok (may be fractional) to won.
///
/// Blank, unparsable or non-positive input yields `None`.
pub fn eok_to_won(input: &str) -> Option<i64> {
    let eok: f64 = input.trim().replace(',', "").parse().ok()?;
    if !eok.is_finite() || eok <= 0.0 {
        return None;
    }
    Some((eok * WON_PER_EOK as f64).round() as i64)
}
