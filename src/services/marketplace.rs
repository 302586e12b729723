// src/services/marketplace.rs

//! Marketplace search adapter.
//!
//! Fetches a marketplace's search results page, optionally through the
//! scraping proxy, and extracts listings using configured CSS selectors.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::{Url, form_urlencoded};

use crate::error::Result;
use crate::models::{Listing, ProxyConfig, QUERY_PLACEHOLDER, SourceConfig};
use crate::services::SourceAdapter;
use crate::utils::http::fetch_text;
use crate::utils::{normalize_whitespace, parse_price, parse_selector, resolve_url};

/// Parsed selectors for one source.
struct ItemSelectors {
    item: Selector,
    title: Selector,
    price: Selector,
    link: Option<Selector>,
    rating: Option<Selector>,
}

impl ItemSelectors {
    fn from_source(source: &SourceConfig) -> Result<Self> {
        Ok(Self {
            item: parse_selector(&source.item_selector)?,
            title: parse_selector(&source.title_selector)?,
            price: parse_selector(&source.price_selector)?,
            link: source
                .link_selector
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            rating: source
                .rating_selector
                .as_deref()
                .map(parse_selector)
                .transpose()?,
        })
    }
}

/// Adapter for a marketplace described by a `SourceConfig`.
pub struct MarketplaceAdapter {
    source: SourceConfig,
    proxy: ProxyConfig,
    client: Client,
    selectors: ItemSelectors,
}

impl MarketplaceAdapter {
    /// Create an adapter, failing if any configured selector is invalid.
    pub fn new(source: SourceConfig, proxy: ProxyConfig, client: Client) -> Result<Self> {
        let selectors = ItemSelectors::from_source(&source)?;
        Ok(Self {
            source,
            proxy,
            client,
            selectors,
        })
    }

    /// Marketplace search page URL for a query.
    pub fn search_url(&self, query: &str) -> Result<Url> {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let url = self.source.search_url.replace(QUERY_PLACEHOLDER, &encoded);
        Ok(Url::parse(&url)?)
    }

    /// URL actually requested: the search page itself, or the proxy wrapping it.
    fn request_url(&self, target: &Url) -> Result<Url> {
        if !self.source.via_proxy {
            return Ok(target.clone());
        }

        let api_key = self.proxy.api_key.as_deref().unwrap_or_default();
        let render = if self.source.render { "true" } else { "false" };
        let url = Url::parse_with_params(
            &self.proxy.base_url,
            &[
                ("api_key", api_key),
                ("url", target.as_str()),
                ("render", render),
                ("country_code", self.proxy.country_code.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Extract listings from a search results page.
    ///
    /// Items without a title or a readable price are skipped.
    pub fn parse_listings(&self, html: &str, page_url: &Url) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let mut listings = Vec::new();

        for item in document.select(&self.selectors.item) {
            if listings.len() >= self.source.max_items {
                break;
            }
            match self.parse_item(&item, page_url, listings.len()) {
                Some(listing) => listings.push(listing),
                None => log::debug!("[{}] Skipping unparseable item", self.source.id),
            }
        }

        listings
    }

    fn parse_item(&self, item: &ElementRef, page_url: &Url, index: usize) -> Option<Listing> {
        let title_elem = item.select(&self.selectors.title).next()?;
        let title = normalize_whitespace(&title_elem.text().collect::<String>());
        if title.is_empty() {
            return None;
        }

        let price_elem = item.select(&self.selectors.price).next()?;
        let price = parse_price(&price_elem.text().collect::<String>())?;

        let rating = self
            .selectors
            .rating
            .as_ref()
            .and_then(|sel| item.select(sel).next())
            .and_then(|el| parse_price(&el.text().collect::<String>()))
            .unwrap_or(self.source.default_rating);

        let link_elem = self
            .selectors
            .link
            .as_ref()
            .and_then(|sel| item.select(sel).next())
            .unwrap_or(title_elem);
        let url = link_elem
            .value()
            .attr(&self.source.link_attr)
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(|href| resolve_url(page_url, href))
            .unwrap_or_else(|| page_url.to_string());

        Some(Listing {
            id: format!("{}_{}", self.source.id, index),
            title,
            price,
            currency: self.source.currency.clone(),
            seller: self.source.name.clone(),
            rating,
            url,
            best_deal: false,
            badge: self.source.badge.clone(),
        })
    }
}

#[async_trait]
impl SourceAdapter for MarketplaceAdapter {
    fn id(&self) -> &str {
        &self.source.id
    }

    async fn fetch_listings(&self, query: &str) -> Result<Vec<Listing>> {
        let page_url = self.search_url(query)?;
        let request_url = self.request_url(&page_url)?;

        log::debug!("[{}] Fetching {}", self.source.id, page_url);
        let html = fetch_text(&self.client, request_url, &self.source.id).await?;

        let listings = self.parse_listings(&html, &page_url);
        log::debug!("[{}] Extracted {} listings", self.source.id, listings.len());
        Ok(listings)
    }
}
