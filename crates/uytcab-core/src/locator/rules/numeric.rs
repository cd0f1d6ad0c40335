//! Signed integer normalization for report cells.

/// Triangle glyph used in Japanese financial tables as a minus sign.
pub const NEGATIVE_GLYPH: char = '▲';

/// Parse cell text such as `"▲1,234"`, `"+500"` or `"¥ 12,000"` into an integer.
///
/// Every non-digit is dropped after sign detection, so separators, currency
/// symbols and the negation glyph never reach the parser. Zero is never
/// negated. Returns `None` for blank text, text without digits, or a
/// magnitude that does not fit in `i64`.
pub fn normalize_number(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let negative = text.contains(NEGATIVE_GLYPH) || text.starts_with('-');

    let digits: String = text
        .chars()
        .filter(|c| *c != '+')
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().ok()?;
    if negative && magnitude > 0 {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}
