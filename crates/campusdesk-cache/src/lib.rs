//! # Campusdesk Cache
//!
//! Caching utilities for the Campusdesk API.
//!
//! This crate provides:
//! - [`MonthCache`]: process-local, per-key snapshot cache with an explicit
//!   `Unfetched → Loading → Ready | Error` lifecycle
//! - Cache key generation utilities
//! - HTTP caching middleware (ETag, Cache-Control, `X-Cache`)
//!
//! # Example
//!
//! ```ignore
//! use campusdesk_cache::{MonthCache, MonthState, keys};
//!
//! let cache: MonthCache<MonthData> = MonthCache::new();
//! let key = keys::calendar::month_for_region("2026-10", "IN", None);
//!
//! cache.begin_loading(&key)?;
//! let snapshot = cache.store(&key, fetched)?;
//! assert_eq!(cache.state(&key)?, MonthState::Ready);
//! ```

pub mod keys;
pub mod middleware;
pub mod month;

pub use middleware::{
    CacheControlConfig, CacheStatus, X_CACHE, cache_control, etag_middleware,
};
pub use month::{CacheError, MonthCache, MonthState};
