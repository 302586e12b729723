// src/pipeline/search.rs

//! Multi-source search aggregation.
//!
//! Every configured source is queried concurrently. Each call is bounded by a
//! timeout and its outcome is kept in the source's slot, so failures and slow
//! sources never affect the others and the merge order never depends on
//! completion order. Successful listings are merged in source priority order,
//! ranked, and truncated. When nothing comes back the fallback generator
//! supplies synthetic listings.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future;
use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{Config, Listing, SearchConfig};
use crate::pipeline::rank_listings;
use crate::services::{FallbackGenerator, SourceAdapter, build_adapters};

/// Runtime settings for an aggregator.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub result_cap: usize,
    pub adapter_timeout: Duration,
    pub fallback_enabled: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            result_cap: config.result_cap,
            adapter_timeout: Duration::from_secs(config.adapter_timeout_secs),
            fallback_enabled: config.fallback_enabled,
        }
    }
}

/// How one source fared during a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Ok { count: usize },
    Failed { message: String },
    TimedOut,
}

/// Per-source result summary.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source_id: String,
    #[serde(flatten)]
    pub status: SourceStatus,
    pub elapsed_ms: u64,
}

impl SourceReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, SourceStatus::Ok { .. })
    }
}

/// Why synthetic listings were returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// At least one source answered, but none had listings
    NoResults,
    /// Every source failed or timed out
    AllSourcesFailed,
}

/// Where the returned listings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum ResultOrigin {
    /// Ranked listings from live sources
    Live,
    /// Synthetic listings
    Fallback(FallbackReason),
    /// Nothing to return (blank query, or fallback disabled)
    Empty,
}

/// Full result of a search, including per-source diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub listings: Vec<Listing>,
    pub origin: ResultOrigin,
    pub reports: Vec<SourceReport>,
}

impl SearchOutcome {
    fn empty(query: &str) -> Self {
        Self {
            query: query.to_string(),
            listings: Vec::new(),
            origin: ResultOrigin::Empty,
            reports: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, ResultOrigin::Fallback(_))
    }
}

/// Queries all sources for a search term and merges their listings.
pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    settings: SearchSettings,
    fallback: FallbackGenerator,
}

impl Aggregator {
    /// Create an aggregator over adapters given in priority order.
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, settings: SearchSettings) -> Self {
        Self {
            adapters,
            settings,
            fallback: FallbackGenerator::new(),
        }
    }

    /// Create an aggregator with the adapters enabled in `config`.
    ///
    /// The configuration is validated first.
    pub fn from_config(config: &Config, client: &Client) -> Result<Self> {
        config.validate()?;
        let adapters = build_adapters(config, client)?;
        Ok(Self::new(adapters, SearchSettings::from(&config.search)))
    }

    /// Identifiers of the active sources, in priority order.
    pub fn source_ids(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.id()).collect()
    }

    /// Search all sources and return the ranked listings.
    ///
    /// A blank query returns an empty list without contacting any source.
    pub async fn search(&self, query: &str) -> Vec<Listing> {
        self.search_detailed(query).await.listings
    }

    /// Search all sources, also reporting where the listings came from.
    pub async fn search_detailed(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            log::debug!("Ignoring blank query");
            return SearchOutcome::empty(query);
        }

        log::info!(
            "Searching {} sources for '{}'",
            self.adapters.len(),
            query
        );

        let results = future::join_all(
            self.adapters
                .iter()
                .map(|adapter| self.fetch_from(adapter.as_ref(), query)),
        )
        .await;

        let mut merged = Vec::new();
        let mut reports = Vec::with_capacity(results.len());
        for (report, listings) in results {
            if let Some(listings) = listings {
                merged.extend(listings);
            }
            reports.push(report);
        }

        if merged.is_empty() {
            return self.fallback_outcome(query, reports);
        }

        let listings = rank_listings(merged, self.settings.result_cap);
        log::info!(
            "Found {} listings for '{}' ({} of {} sources answered)",
            listings.len(),
            query,
            reports.iter().filter(|r| r.succeeded()).count(),
            reports.len()
        );

        SearchOutcome {
            query: query.to_string(),
            listings,
            origin: ResultOrigin::Live,
            reports,
        }
    }

    /// Run one adapter under the timeout; failures are logged and reported.
    async fn fetch_from(
        &self,
        adapter: &dyn SourceAdapter,
        query: &str,
    ) -> (SourceReport, Option<Vec<Listing>>) {
        let started = Instant::now();
        let timeout = self.settings.adapter_timeout;

        let result = match tokio::time::timeout(timeout, adapter.fetch_listings(query)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout {
                source_name: adapter.id().to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (status, listings) = match result {
            Ok(listings) => {
                log::debug!(
                    "[{}] {} listings in {}ms",
                    adapter.id(),
                    listings.len(),
                    elapsed_ms
                );
                (
                    SourceStatus::Ok {
                        count: listings.len(),
                    },
                    Some(listings),
                )
            }
            Err(AppError::Timeout { .. }) => {
                log::warn!("[{}] Timed out after {}ms", adapter.id(), elapsed_ms);
                (SourceStatus::TimedOut, None)
            }
            Err(error) => {
                log::warn!("[{}] Search failed: {}", adapter.id(), error);
                (
                    SourceStatus::Failed {
                        message: error.to_string(),
                    },
                    None,
                )
            }
        };

        let report = SourceReport {
            source_id: adapter.id().to_string(),
            status,
            elapsed_ms,
        };
        (report, listings)
    }

    fn fallback_outcome(&self, query: &str, reports: Vec<SourceReport>) -> SearchOutcome {
        let reason = if !reports.is_empty() && reports.iter().all(|r| !r.succeeded()) {
            FallbackReason::AllSourcesFailed
        } else {
            FallbackReason::NoResults
        };

        if !self.settings.fallback_enabled {
            log::info!("No listings found for '{}'", query);
            return SearchOutcome {
                reports,
                ..SearchOutcome::empty(query)
            };
        }

        log::info!(
            "No live listings for '{}' ({:?}), using generated listings",
            query,
            reason
        );
        let mut listings = self.fallback.generate(query);
        listings.truncate(self.settings.result_cap);

        SearchOutcome {
            query: query.to_string(),
            listings,
            origin: ResultOrigin::Fallback(reason),
            reports,
        }
    }
}
