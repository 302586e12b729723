//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::parse_selector;

/// Placeholder replaced by the URL-encoded query in `SourceConfig::search_url`.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Aggregation behavior
    #[serde(default)]
    pub search: SearchConfig,

    /// Scraping proxy used by sources with `via_proxy`
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Marketplaces, in priority order
    #[serde(default = "defaults::default_sources")]
    pub sources: Vec<SourceConfig>,

    /// CLI output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.search.adapter_timeout_secs == 0 {
            return Err(AppError::validation(
                "search.adapter_timeout_secs must be > 0",
            ));
        }
        if self.search.result_cap == 0 {
            return Err(AppError::validation("search.result_cap must be > 0"));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            source.validate()?;
            if !seen.insert(source.id.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate source id '{}'",
                    source.id
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            search: SearchConfig::default(),
            proxy: ProxyConfig::default(),
            sources: defaults::default_sources(),
            output: OutputConfig::default(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of listings returned per search
    #[serde(default = "defaults::result_cap")]
    pub result_cap: usize,

    /// Deadline for a single source, after which it counts as failed
    #[serde(default = "defaults::adapter_timeout")]
    pub adapter_timeout_secs: u64,

    /// Return synthetic listings when no source produced any
    #[serde(default = "defaults::fallback_enabled")]
    pub fallback_enabled: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_cap: defaults::result_cap(),
            adapter_timeout_secs: defaults::adapter_timeout(),
            fallback_enabled: defaults::fallback_enabled(),
        }
    }
}

/// Scraping proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy endpoint
    #[serde(default = "defaults::proxy_base_url")]
    pub base_url: String,

    /// Proxy credentials; sources that need the proxy are disabled without it
    #[serde(default)]
    pub api_key: Option<String>,

    /// Country the proxy should browse from
    #[serde(default = "defaults::country_code")]
    pub country_code: String,
}

impl ProxyConfig {
    /// Whether usable credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::proxy_base_url(),
            api_key: None,
            country_code: defaults::country_code(),
        }
    }
}

/// A single marketplace and how to read its search results page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Short identifier, also the listing id prefix
    pub id: String,

    /// Seller name shown on listings
    pub name: String,

    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// Search page URL containing `{query}`
    pub search_url: String,

    /// Fetch through the scraping proxy
    #[serde(default)]
    pub via_proxy: bool,

    /// Ask the proxy to execute JavaScript before returning the page
    #[serde(default)]
    pub render: bool,

    #[serde(default = "defaults::currency")]
    pub currency: String,

    /// Maximum listings taken from one results page
    #[serde(default = "defaults::max_items")]
    pub max_items: usize,

    /// Badge attached to every listing from this source
    #[serde(default)]
    pub badge: Option<String>,

    /// Rating used when the page shows none
    #[serde(default = "defaults::default_rating")]
    pub default_rating: f64,

    /// CSS selector for one result item
    pub item_selector: String,

    /// CSS selector for the title, relative to the item
    pub title_selector: String,

    /// CSS selector for the price, relative to the item
    pub price_selector: String,

    /// CSS selector for the link (defaults to the title element)
    #[serde(default)]
    pub link_selector: Option<String>,

    /// CSS selector for the rating text
    #[serde(default)]
    pub rating_selector: Option<String>,

    /// HTML attribute for link extraction
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,
}

impl SourceConfig {
    /// Validate a single source definition.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("source id is empty"));
        }
        if !self.search_url.contains(QUERY_PLACEHOLDER) {
            return Err(AppError::validation(format!(
                "source '{}': search_url has no {} placeholder",
                self.id, QUERY_PLACEHOLDER
            )));
        }
        if self.max_items == 0 {
            return Err(AppError::validation(format!(
                "source '{}': max_items must be > 0",
                self.id
            )));
        }

        parse_selector(&self.item_selector)?;
        parse_selector(&self.title_selector)?;
        parse_selector(&self.price_selector)?;
        for selector in self.link_selector.iter().chain(&self.rating_selector) {
            parse_selector(selector)?;
        }
        Ok(())
    }
}

/// CLI output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Line template, see `Listing::format`
    #[serde(default = "defaults::template")]
    pub template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            template: defaults::template(),
        }
    }
}

mod defaults {
    use super::SourceConfig;

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; dealfinder/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Search defaults
    pub fn result_cap() -> usize {
        12
    }
    pub fn adapter_timeout() -> u64 {
        20
    }
    pub fn fallback_enabled() -> bool {
        true
    }

    // Proxy defaults
    pub fn proxy_base_url() -> String {
        "http://api.scraperapi.com".into()
    }
    pub fn country_code() -> String {
        "us".into()
    }

    // Source defaults
    pub fn enabled() -> bool {
        true
    }
    pub fn currency() -> String {
        "USD".into()
    }
    pub fn max_items() -> usize {
        10
    }
    pub fn default_rating() -> f64 {
        4.0
    }
    pub fn link_attr() -> String {
        "href".into()
    }

    pub fn template() -> String {
        "{best} {price} {currency}  {seller}  {title}".into()
    }

    pub fn default_sources() -> Vec<SourceConfig> {
        vec![
            SourceConfig {
                id: "amazon".to_string(),
                name: "Amazon".to_string(),
                enabled: true,
                search_url: "https://www.amazon.com/s?k={query}".to_string(),
                via_proxy: true,
                render: true,
                currency: currency(),
                max_items: 10,
                badge: Some("Prime Eligible".to_string()),
                default_rating: 4.0,
                item_selector: "div.s-result-item[data-component-type=\"s-search-result\"]"
                    .to_string(),
                title_selector: "span.a-size-medium.a-color-base.a-text-normal".to_string(),
                price_selector: "span.a-price-whole".to_string(),
                link_selector: Some("a.a-link-normal".to_string()),
                rating_selector: Some("span.a-icon-alt".to_string()),
                link_attr: link_attr(),
            },
            SourceConfig {
                id: "ebay".to_string(),
                name: "eBay".to_string(),
                enabled: true,
                search_url: "https://www.ebay.com/sch/i.html?_nkw={query}".to_string(),
                via_proxy: true,
                render: false,
                currency: currency(),
                max_items: 8,
                badge: Some("Auction".to_string()),
                default_rating: 3.8,
                item_selector: "li.s-item".to_string(),
                title_selector: ".s-item__title".to_string(),
                price_selector: ".s-item__price".to_string(),
                link_selector: Some("a.s-item__link".to_string()),
                rating_selector: None,
                link_attr: link_attr(),
            },
            SourceConfig {
                id: "walmart".to_string(),
                name: "Walmart".to_string(),
                enabled: true,
                search_url: "https://www.walmart.com/search?q={query}".to_string(),
                via_proxy: true,
                render: true,
                currency: currency(),
                max_items: 6,
                badge: Some("Free Pickup".to_string()),
                default_rating: 4.1,
                item_selector: "div[data-item-id]".to_string(),
                title_selector: "span[data-automation-id=\"product-title\"]".to_string(),
                price_selector: "div[data-automation-id=\"product-price\"]".to_string(),
                link_selector: Some("a[link-identifier]".to_string()),
                rating_selector: None,
                link_attr: link_attr(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_result_cap() {
        let mut config = Config::default();
        config.search.result_cap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_source_ids() {
        let mut config = Config::default();
        let dup = config.sources[0].clone();
        config.sources.push(dup);
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn validate_rejects_search_url_without_placeholder() {
        let mut config = Config::default();
        config.sources[1].search_url = "https://www.ebay.com/sch/i.html".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.sources[2].price_selector = "[[invalid".to_string();
        assert!(matches!(config.validate(), Err(AppError::Selector { .. })));
    }

    #[test]
    fn default_sources_keep_priority_order() {
        let ids: Vec<_> = Config::default()
            .sources
            .iter()
            .map(|s| s.id.clone())
            .collect();
        assert_eq!(ids, ["amazon", "ebay", "walmart"]);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [search]
            result_cap = 5

            [proxy]
            api_key = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.search.result_cap, 5);
        assert_eq!(config.search.adapter_timeout_secs, 20);
        assert!(config.proxy.has_credentials());
        assert_eq!(config.sources.len(), 3);
    }

    #[test]
    fn bundled_sample_config_is_valid() {
        let config: Config = toml::from_str(include_str!("../../storage/config.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.sources.len(), 3);
        assert!(!config.proxy.has_credentials());
    }

    #[test]
    fn blank_api_key_is_not_a_credential() {
        let proxy = ProxyConfig {
            api_key: Some("   ".to_string()),
            ..ProxyConfig::default()
        };
        assert!(!proxy.has_credentials());
    }
}
