//! Local filesystem storage implementation.
//!
//! Keeps history, favorites and the last result set as JSON documents under a
//! root directory. Writes go to a temp file first and are renamed into place.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{FavoriteRecord, Listing, SearchRecord};
use crate::storage::{Favorites, HISTORY_LIMIT, SearchHistory};

const HISTORY_KEY: &str = "history.json";
const FAVORITES_KEY: &str = "favorites.json";
const LAST_SEARCH_KEY: &str = "last_search.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
                AppError::storage(format!("{} is corrupted: {}", self.path(key).display(), e))
            }),
            None => Ok(None),
        }
    }

    /// Remember the listings of the latest search.
    pub async fn save_last_search(&self, listings: &[Listing]) -> Result<()> {
        self.write_json(LAST_SEARCH_KEY, listings).await
    }

    /// Listings of the latest search, empty if none was saved.
    pub async fn load_last_search(&self) -> Result<Vec<Listing>> {
        Ok(self.read_json(LAST_SEARCH_KEY).await?.unwrap_or_default())
    }

    async fn load_history(&self) -> Result<Vec<SearchRecord>> {
        Ok(self.read_json(HISTORY_KEY).await?.unwrap_or_default())
    }

    async fn load_favorites(&self) -> Result<Vec<FavoriteRecord>> {
        Ok(self.read_json(FAVORITES_KEY).await?.unwrap_or_default())
    }
}

#[async_trait]
impl SearchHistory for LocalStorage {
    async fn add_search(&self, query: &str, result_count: usize) -> Result<()> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(());
        }

        let mut history = self.load_history().await?;
        history.insert(0, SearchRecord::new(query, result_count));
        history.truncate(HISTORY_LIMIT);

        self.write_json(HISTORY_KEY, &history).await?;
        log::debug!("Recorded search '{}' ({} results)", query, result_count);
        Ok(())
    }

    async fn recent_searches(&self, limit: usize) -> Result<Vec<SearchRecord>> {
        let mut history = self.load_history().await?;
        history.truncate(limit);
        Ok(history)
    }

    async fn clear_history(&self) -> Result<()> {
        self.write_json(HISTORY_KEY, &Vec::<SearchRecord>::new())
            .await
    }
}

#[async_trait]
impl Favorites for LocalStorage {
    async fn add_favorite(&self, listing: &Listing) -> Result<()> {
        let mut favorites = self.load_favorites().await?;
        favorites.retain(|f| f.item_id != listing.id);
        favorites.insert(0, FavoriteRecord::from(listing));

        self.write_json(FAVORITES_KEY, &favorites).await?;
        log::debug!("Saved favorite {}", listing.id);
        Ok(())
    }

    async fn remove_favorite(&self, item_id: &str) -> Result<bool> {
        let mut favorites = self.load_favorites().await?;
        let before = favorites.len();
        favorites.retain(|f| f.item_id != item_id);

        if favorites.len() == before {
            return Ok(false);
        }
        self.write_json(FAVORITES_KEY, &favorites).await?;
        Ok(true)
    }

    async fn favorites(&self) -> Result<Vec<FavoriteRecord>> {
        self.load_favorites().await
    }

    async fn is_favorite(&self, item_id: &str) -> Result<bool> {
        Ok(self
            .load_favorites()
            .await?
            .iter()
            .any(|f| f.item_id == item_id))
    }
}
