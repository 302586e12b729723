//! Utility functions and helpers.

pub mod http;
pub mod price;

use scraper::Selector;
use url::Url;

use crate::error::{AppError, Result};

pub use price::parse_price;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Parse a CSS selector, keeping the offending text in the error.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://www.ebay.com/sch/i.html?_nkw=tv").unwrap();
        assert_eq!(
            resolve_url(&base, "/itm/123"),
            "https://www.ebay.com/itm/123"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_parse_selector() {
        assert!(parse_selector("div.s-item").is_ok());
        assert!(parse_selector("li:has(a)").is_ok());
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  Apple \n iPhone\t15  "),
            "Apple iPhone 15"
        );
    }
}
