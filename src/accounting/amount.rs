use std::str::FromStr;

use rust_decimal::Decimal;

/// Normalizes a monetary cell such as `$1,234.56` or `(12.00)` into an exact decimal.
///
/// Returns `None` when nothing numeric is left after cleaning, so callers can
/// tell a blank cell from a malformed one.
pub fn try_parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned = raw.trim().replace(['$', ','], "");
    let cleaned = cleaned.trim();

    let (negative, body) = match cleaned.strip_prefix('(').and_then(|inner| inner.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cleaned),
    };

    let digits: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if digits.is_empty() {
        return None;
    }

    let amount = Decimal::from_str(&digits).ok()?;

    if negative {
        Some(-amount.abs())
    } else {
        Some(amount)
    }
}

/// Like [`try_parse_amount`] but never fails: missing or malformed cells become zero.
pub fn parse_amount(raw: Option<&str>) -> Decimal {
    raw.and_then(try_parse_amount).unwrap_or(Decimal::ZERO)
}
