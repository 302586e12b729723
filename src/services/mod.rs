//! Service layer for the search application.
//!
//! This module contains:
//! - The source adapter contract (`SourceAdapter`)
//! - The selector-driven marketplace adapter (`MarketplaceAdapter`)
//! - Synthetic listings for empty searches (`FallbackGenerator`)

mod fallback;
mod marketplace;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{Config, Listing};

pub use fallback::FallbackGenerator;
pub use marketplace::MarketplaceAdapter;

/// Turns a query into listings for one external marketplace.
///
/// Implementations must return `Ok(vec![])` when the marketplace simply has no
/// results, and `Err` for transport or upstream failures. A single malformed
/// item is skipped rather than failing the whole call. Calls share no mutable
/// state and may run concurrently.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Stable identifier used in logs and reports.
    fn id(&self) -> &str;

    /// Fetch listings for a non-empty, trimmed query.
    async fn fetch_listings(&self, query: &str) -> Result<Vec<Listing>>;
}

/// Build the enabled adapters from configuration, in priority order.
///
/// Sources that go through the scraping proxy are skipped when no proxy
/// credentials are configured.
pub fn build_adapters(config: &Config, client: &Client) -> Result<Vec<Arc<dyn SourceAdapter>>> {
    let mut adapters: Vec<Arc<dyn SourceAdapter>> = Vec::new();

    for source in &config.sources {
        if !source.enabled {
            log::debug!("Source '{}' is disabled", source.id);
            continue;
        }
        if source.via_proxy && !config.proxy.has_credentials() {
            log::warn!(
                "Source '{}' needs the scraping proxy but no api key is configured; skipping",
                source.id
            );
            continue;
        }

        let adapter = MarketplaceAdapter::new(source.clone(), config.proxy.clone(), client.clone())?;
        adapters.push(Arc::new(adapter));
    }

    Ok(adapters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_sources_skipped_without_credentials() {
        let config = Config::default();
        let adapters = build_adapters(&config, &Client::new()).unwrap();
        assert!(adapters.is_empty());
    }

    #[test]
    fn test_adapters_follow_config_order() {
        let mut config = Config::default();
        config.proxy.api_key = Some("key".to_string());
        config.sources[1].enabled = false;

        let adapters = build_adapters(&config, &Client::new()).unwrap();
        let ids: Vec<_> = adapters.iter().map(|a| a.id()).collect();
        assert_eq!(ids, ["amazon", "walmart"]);
    }

    #[test]
    fn test_direct_sources_need_no_credentials() {
        let mut config = Config::default();
        for source in &mut config.sources {
            source.via_proxy = false;
        }

        let adapters = build_adapters(&config, &Client::new()).unwrap();
        assert_eq!(adapters.len(), 3);
    }
}
