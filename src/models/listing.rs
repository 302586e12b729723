//! Listing data structure.

use serde::{Deserialize, Serialize};

/// Badge assigned to the cheapest listing when it has none of its own.
pub const BEST_DEAL_BADGE: &str = "Best Deal";

/// One normalized product offer returned by a source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Identifier, unique within one adapter invocation
    pub id: String,

    /// Display title
    pub title: String,

    /// Non-negative amount in `currency`
    pub price: f64,

    /// Currency code (e.g., "USD")
    pub currency: String,

    /// Marketplace name
    pub seller: String,

    /// Informational rating, not range-checked
    pub rating: f64,

    /// Link to the offer
    pub url: String,

    /// Set by ranking on the single cheapest listing
    #[serde(default)]
    pub best_deal: bool,

    /// Short label such as "Prime Eligible"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl Listing {
    /// Format listing for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{title}`, `{price}`, `{currency}`, `{seller}`
    /// - `{rating}`, `{url}`, `{badge}`, `{best}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{id}", &self.id)
            .replace("{title}", &self.title)
            .replace("{price}", &format!("{:.2}", self.price))
            .replace("{currency}", &self.currency)
            .replace("{seller}", &self.seller)
            .replace("{rating}", &format!("{:.1}", self.rating))
            .replace("{url}", &self.url)
            .replace("{badge}", self.badge.as_deref().unwrap_or(""))
            .replace("{best}", if self.best_deal { "*" } else { " " })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing {
            id: "ebay_0".to_string(),
            title: "Sony WH-1000XM5".to_string(),
            price: 278.5,
            currency: "USD".to_string(),
            seller: "eBay".to_string(),
            rating: 4.25,
            url: "https://ebay.com/itm/1".to_string(),
            best_deal: true,
            badge: Some("Auction".to_string()),
        }
    }

    #[test]
    fn test_format() {
        let listing = sample_listing();
        let result = listing.format("{best} {price} {currency} [{seller}] {title} ({badge})");
        assert_eq!(result, "* 278.50 USD [eBay] Sony WH-1000XM5 (Auction)");
    }

    #[test]
    fn test_serializes_best_deal_in_camel_case() {
        let json = serde_json::to_value(sample_listing()).unwrap();
        assert_eq!(json["bestDeal"], serde_json::Value::Bool(true));
        assert!(json.get("best_deal").is_none());
    }

    #[test]
    fn test_missing_badge_is_omitted() {
        let mut listing = sample_listing();
        listing.badge = None;
        let json = serde_json::to_value(&listing).unwrap();
        assert!(json.get("badge").is_none());

        let back: Listing = serde_json::from_value(json).unwrap();
        assert_eq!(back.badge, None);
    }
}
