//! Bounded in-memory cache backed by Moka.

use moka::ops::compute::{CompResult, Op};
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

use super::service::{CacheStats, LinkCache};
use crate::domain::entities::{Link, ResolvedLink};

/// Default maximum entries per namespace.
pub const DEFAULT_CAPACITY: u64 = 10_000;

/// Two independent LRU caches: short code to resolution, and owner to link list.
///
/// Capacity is fixed at construction and applies to each namespace separately.
/// Entries have no TTL; they stay valid until evicted.
#[derive(Debug, Clone)]
pub struct MokaLinkCache {
    destinations: Cache<String, ResolvedLink>,
    owner_links: Cache<Uuid, Arc<Vec<Link>>>,
    capacity: u64,
}

impl MokaLinkCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            destinations: Cache::builder()
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
            owner_links: Cache::builder()
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
            capacity,
        }
    }
}

impl Default for MokaLinkCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LinkCache for MokaLinkCache {
    fn get_destination(&self, short_code: &str) -> Option<ResolvedLink> {
        let hit = self.destinations.get(short_code);
        match &hit {
            Some(_) => debug!(short_code, "Cache HIT"),
            None => trace!(short_code, "Cache MISS"),
        }
        hit
    }

    fn put_destination(&self, short_code: &str, resolved: ResolvedLink) {
        self.destinations.insert(short_code.to_string(), resolved);
        trace!(short_code, "Cached destination");
    }

    fn get_owner_links(&self, owner_id: Uuid) -> Option<Arc<Vec<Link>>> {
        let hit = self.owner_links.get(&owner_id);
        match &hit {
            Some(links) => debug!(%owner_id, count = links.len(), "Cache HIT for owner links"),
            None => trace!(%owner_id, "Cache MISS for owner links"),
        }
        hit
    }

    fn put_owner_links(&self, owner_id: Uuid, links: Arc<Vec<Link>>) {
        trace!(%owner_id, count = links.len(), "Caching owner links");
        self.owner_links.insert(owner_id, links);
    }

    fn extend_owner_links(&self, owner_id: Uuid, link: Link) -> bool {
        let result = self
            .owner_links
            .entry(owner_id)
            .and_compute_with(|current| match current {
                Some(entry) if !entry.value().iter().any(|l| l.id == link.id) => {
                    let cached = entry.value();
                    let mut links = Vec::with_capacity(cached.len() + 1);
                    links.push(link);
                    links.extend(cached.iter().cloned());
                    Op::Put(Arc::new(links))
                }
                _ => Op::Nop,
            });

        let extended = matches!(result, CompResult::ReplacedWith(_));
        debug!(%owner_id, extended, "Extended cached owner links");
        extended
    }

    fn stats(&self) -> CacheStats {
        self.destinations.run_pending_tasks();
        self.owner_links.run_pending_tasks();

        CacheStats {
            destinations: self.destinations.entry_count(),
            owner_lists: self.owner_links.entry_count(),
            capacity: self.capacity,
        }
    }

    fn backend(&self) -> &'static str {
        "moka"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn resolved(url: &str) -> ResolvedLink {
        ResolvedLink {
            link_id: Uuid::new_v4(),
            destination: url.to_string(),
        }
    }

    fn link(owner_id: Uuid, slug: &str, age_minutes: i64) -> Link {
        Link {
            id: Uuid::new_v4(),
            owner_id,
            slug: slug.to_string(),
            short_code: format!("code-{slug}"),
            destination: format!("https://example.com/{slug}"),
            is_active: true,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[test]
    fn test_destination_get_and_put() {
        let cache = MokaLinkCache::default();
        assert!(cache.get_destination("abc").is_none());

        let value = resolved("https://example.com");
        cache.put_destination("abc", value.clone());

        assert_eq!(cache.get_destination("abc"), Some(value));
    }

    #[test]
    fn test_put_replaces_existing_destination() {
        let cache = MokaLinkCache::new(10);
        cache.put_destination("abc", resolved("https://old.example.com"));
        cache.put_destination("abc", resolved("https://new.example.com"));

        assert_eq!(
            cache.get_destination("abc").map(|r| r.destination),
            Some("https://new.example.com".to_string())
        );
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let cache = MokaLinkCache::new(10);
        let owner = Uuid::new_v4();

        cache.put_destination(&owner.to_string(), resolved("https://example.com"));

        assert!(cache.get_owner_links(owner).is_none());
    }

    #[test]
    fn test_extend_prepends_to_cached_list() {
        let cache = MokaLinkCache::new(10);
        let owner = Uuid::new_v4();
        let older = link(owner, "a", 10);
        cache.put_owner_links(owner, Arc::new(vec![older.clone()]));

        let newer = link(owner, "b", 0);
        assert!(cache.extend_owner_links(owner, newer.clone()));

        let links = cache.get_owner_links(owner).unwrap();
        assert_eq!(links.as_slice(), &[newer, older]);
    }

    #[test]
    fn test_extend_without_cached_list_is_noop() {
        let cache = MokaLinkCache::new(10);
        let owner = Uuid::new_v4();

        assert!(!cache.extend_owner_links(owner, link(owner, "a", 0)));
        assert!(cache.get_owner_links(owner).is_none());
    }

    #[test]
    fn test_extend_skips_duplicate() {
        let cache = MokaLinkCache::new(10);
        let owner = Uuid::new_v4();
        let existing = link(owner, "a", 0);
        cache.put_owner_links(owner, Arc::new(vec![existing.clone()]));

        assert!(!cache.extend_owner_links(owner, existing));
        assert_eq!(cache.get_owner_links(owner).unwrap().len(), 1);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let cache = MokaLinkCache::new(2);
        for code in ["a", "b", "c", "d"] {
            cache.put_destination(code, resolved("https://example.com"));
        }

        let stats = cache.stats();
        assert!(stats.destinations <= 2, "entries: {}", stats.destinations);
        assert_eq!(stats.capacity, 2);
    }

    #[test]
    fn test_concurrent_access() {
        let cache = MokaLinkCache::new(1_000);
        let owner = Uuid::new_v4();
        cache.put_owner_links(owner, Arc::new(Vec::new()));

        std::thread::scope(|scope| {
            for i in 0..8 {
                let cache = &cache;
                scope.spawn(move || {
                    let code = format!("code-{i}");
                    cache.put_destination(&code, resolved("https://example.com"));
                    assert!(cache.get_destination(&code).is_some());
                    cache.extend_owner_links(owner, link(owner, &code, 0));
                });
            }
        });

        assert_eq!(cache.get_owner_links(owner).unwrap().len(), 8);
    }
}
