//! Cache service trait.

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, ResolvedLink};

/// Entry counts reported by health checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub destinations: u64,
    pub owner_lists: u64,
    /// Maximum entries per namespace.
    pub capacity: u64,
}

/// Cache of resolution results and per-owner link lists.
///
/// Each namespace has its own key type, so a short code can never be read back
/// as an owner list or the other way round. Implementations must be safe for
/// concurrent use from many request tasks.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MokaLinkCache`] - Bounded LRU caches
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
pub trait LinkCache: Send + Sync {
    /// Cached resolution for a short code.
    fn get_destination(&self, short_code: &str) -> Option<ResolvedLink>;

    /// Inserts or replaces the resolution for a short code.
    fn put_destination(&self, short_code: &str, resolved: ResolvedLink);

    /// Cached list of an owner's links, newest first.
    fn get_owner_links(&self, owner_id: Uuid) -> Option<Arc<Vec<Link>>>;

    /// Replaces the owner's whole cached list.
    fn put_owner_links(&self, owner_id: Uuid, links: Arc<Vec<Link>>);

    /// Adds a freshly created link to the front of the owner's cached list.
    ///
    /// Only writes when a list is already cached and does not yet contain the
    /// link. The read and the write happen as one atomic step for the key.
    /// Returns `true` if the cached list was extended.
    fn extend_owner_links(&self, owner_id: Uuid, link: Link) -> bool;

    fn stats(&self) -> CacheStats;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
