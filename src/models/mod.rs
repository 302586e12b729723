// src/models/mod.rs

//! Domain models for the search application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod listing;
mod records;

// Re-export all public types
pub use config::{
    Config, HttpConfig, OutputConfig, ProxyConfig, QUERY_PLACEHOLDER, SearchConfig, SourceConfig,
};
pub use listing::{BEST_DEAL_BADGE, Listing};
pub use records::{FavoriteRecord, SearchRecord};
