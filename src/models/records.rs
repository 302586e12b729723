//! Records handed to the history and favorites stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Listing;

/// One executed search, as kept in the search history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRecord {
    pub query: String,
    pub result_count: usize,
    pub created_at: DateTime<Utc>,
}

impl SearchRecord {
    pub fn new(query: impl Into<String>, result_count: usize) -> Self {
        Self {
            query: query.into(),
            result_count,
            created_at: Utc::now(),
        }
    }
}

/// A saved listing, keyed by the listing id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteRecord {
    pub item_id: String,
    pub title: String,
    pub price: f64,
    pub currency: String,
    pub seller: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Listing> for FavoriteRecord {
    fn from(listing: &Listing) -> Self {
        Self {
            item_id: listing.id.clone(),
            title: listing.title.clone(),
            price: listing.price,
            currency: listing.currency.clone(),
            seller: listing.seller.clone(),
            url: listing.url.clone(),
            created_at: Utc::now(),
        }
    }
}
