//! Cache module for API responses
//!
//! This module provides an in-memory cache for REST Countries responses, keyed
//! by the fully-qualified request URL and bounded by a fixed freshness window.
//! There is no eviction: the map lives as long as the process.

mod response;

pub use response::{CachedData, ResponseCache, FRESHNESS_WINDOW};
