//! Price text parsing.

use std::sync::OnceLock;

use regex::Regex;

const CURRENCY_SYMBOLS: [char; 5] = ['$', '€', '£', '¥', '₩'];

fn number_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").ok())
        .as_ref()
}

/// Parse a displayed price such as `"$1,299.99"` into a number.
///
/// Currency symbols and thousands separators are ignored. When the text holds
/// several numbers (price ranges like `"$10.00 to $20.00"`) the first one wins.
/// Returns `None` when no finite, non-negative amount can be read, including
/// negative amounts such as `"-$5.00"`.
pub fn parse_price(text: &str) -> Option<f64> {
    let found = number_pattern()?.find(text)?;
    let prefix = text[..found.start()]
        .trim_end_matches(|c: char| c.is_whitespace() || CURRENCY_SYMBOLS.contains(&c));
    if prefix.ends_with('-') {
        return None;
    }

    let raw = found.as_str();
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.parse().ok()?;

    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_number() {
        assert_eq!(parse_price("199"), Some(199.0));
        assert_eq!(parse_price("24.99"), Some(24.99));
    }

    #[test]
    fn test_strips_symbols_and_separators() {
        assert_eq!(parse_price("$1,299.99"), Some(1299.99));
        assert_eq!(parse_price(" US $2,005.00 "), Some(2005.0));
        assert_eq!(parse_price("1,234,567"), Some(1234567.0));
    }

    #[test]
    fn test_range_takes_first_amount() {
        assert_eq!(parse_price("$10.00 to $20.00"), Some(10.0));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("See price in cart"), None);
        assert_eq!(parse_price("$"), None);
    }

    #[test]
    fn test_negative_amounts_rejected() {
        assert_eq!(parse_price("-$5.00"), None);
        assert_eq!(parse_price("- 12"), None);
        assert_eq!(parse_price("€-3,50"), None);
        assert_eq!(parse_price("$10.00 - $20.00"), Some(10.0));
    }
}
