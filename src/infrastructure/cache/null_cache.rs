//! No-op cache implementation for disabled caching.

use std::sync::Arc;
use uuid::Uuid;

use super::service::{CacheStats, LinkCache};
use crate::domain::entities::{Link, ResolvedLink};

/// Cache that never stores anything.
///
/// Selected when `CACHE_CAPACITY=0`. Every lookup misses, so every resolution
/// goes to the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

impl LinkCache for NullCache {
    fn get_destination(&self, _short_code: &str) -> Option<ResolvedLink> {
        None
    }

    fn put_destination(&self, _short_code: &str, _resolved: ResolvedLink) {}

    fn get_owner_links(&self, _owner_id: Uuid) -> Option<Arc<Vec<Link>>> {
        None
    }

    fn put_owner_links(&self, _owner_id: Uuid, _links: Arc<Vec<Link>>) {}

    fn extend_owner_links(&self, _owner_id: Uuid, _link: Link) -> bool {
        false
    }

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }
}
