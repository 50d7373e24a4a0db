//! Cache module for storing records to disk
//!
//! The dashboard remembers the last resolved forecast point so the location
//! does not have to be looked up on every start. Entries carry an expiry
//! timestamp but expired entries are still returned with an `is_expired`
//! flag, so a stale point can be used when weather.gov is unavailable.

mod manager;

pub use manager::{CacheManager, CachedData};

/// Cache key of the last resolved forecast point
pub const POINT_CACHE_KEY: &str = "point_store";
