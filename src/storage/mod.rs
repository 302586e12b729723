//! Storage abstractions for search history and favorites.
//!
//! These stores sit downstream of the aggregator: the caller records a search
//! after results are back, and favorites are saved from returned listings.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml           # Application configuration
//! ├── history.json          # Recent searches, newest first
//! ├── favorites.json        # Saved listings, newest first
//! └── last_search.json      # Listings of the most recent search
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FavoriteRecord, Listing, SearchRecord};

// Re-export for convenience
pub use local::LocalStorage;

/// Maximum number of entries kept in the search history.
pub const HISTORY_LIMIT: usize = 100;

/// Store for executed searches.
#[async_trait]
pub trait SearchHistory: Send + Sync {
    /// Record a search and how many listings it returned.
    ///
    /// Blank queries are ignored.
    async fn add_search(&self, query: &str, result_count: usize) -> Result<()>;

    /// Most recent searches first, at most `limit`.
    async fn recent_searches(&self, limit: usize) -> Result<Vec<SearchRecord>>;

    /// Remove every recorded search.
    async fn clear_history(&self) -> Result<()>;
}

/// Store for saved listings, keyed by listing id.
#[async_trait]
pub trait Favorites: Send + Sync {
    /// Save a listing; saving an id again replaces the earlier entry.
    async fn add_favorite(&self, listing: &Listing) -> Result<()>;

    /// Remove a listing by id. Returns whether anything was removed.
    async fn remove_favorite(&self, item_id: &str) -> Result<bool>;

    /// All favorites, most recently saved first.
    async fn favorites(&self) -> Result<Vec<FavoriteRecord>>;

    /// Whether a listing id is saved.
    async fn is_favorite(&self, item_id: &str) -> Result<bool>;
}
