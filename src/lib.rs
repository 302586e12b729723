// src/lib.rs

//! dealfinder Library
//!
//! Queries several marketplaces concurrently, merges their listings and ranks
//! them by price. See [`pipeline::Aggregator`] for the entry point.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
