//! Pipeline entry points for search operations.
//!
//! - `rank_listings`: Sort, flag the best deal and truncate merged listings
//! - `Aggregator`: Fan a query out to every source and merge the outcomes

pub mod rank;
pub mod search;

pub use rank::rank_listings;
pub use search::{
    Aggregator, FallbackReason, ResultOrigin, SearchOutcome, SearchSettings, SourceReport,
    SourceStatus,
};
