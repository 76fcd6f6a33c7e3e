//! In-process caching layer for link resolution.
//!
//! Provides a [`LinkCache`] trait with two implementations:
//! - [`MokaLinkCache`] - Bounded LRU caches, one per namespace
//! - [`NullCache`] - No-op implementation for disabled caching

mod moka_cache;
mod null_cache;
mod service;

pub use moka_cache::MokaLinkCache;
pub use null_cache::NullCache;
pub use service::{CacheStats, LinkCache};
