//! Link resolution, listing and creation service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink, ResolvedLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, SHORT_CODE_CONSTRAINT, SLUG_CONSTRAINT};
use crate::infrastructure::cache::LinkCache;
use crate::utils::code_generator::{generate_code, validate_destination, validate_slug};

/// Attempts at finding an unused short code before giving up.
const MAX_CODE_ATTEMPTS: usize = 10;

/// Resolves short codes and serves owner link lists through the cache.
///
/// The cache is consulted first; the store is only queried on a miss.
/// Concurrent misses on the same key may both query the store and both write
/// the cache. The value is deterministic, so the last write wins harmlessly.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    cache: Arc<dyn LinkCache>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, cache: Arc<dyn LinkCache>) -> Self {
        Self {
            link_repository,
            cache,
        }
    }

    /// Resolves a short code to its destination and link identifier.
    ///
    /// A cache hit returns without touching the store. A store miss leaves the
    /// cache untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active link has this short code.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn resolve(&self, short_code: &str) -> Result<ResolvedLink, AppError> {
        if let Some(resolved) = self.cache.get_destination(short_code) {
            metrics::counter!("resolution_cache_hits_total").increment(1);
            return Ok(resolved);
        }
        metrics::counter!("resolution_cache_misses_total").increment(1);

        let resolved = self
            .link_repository
            .find_active_by_short_code(short_code)
            .await?
            .ok_or_else(|| AppError::link_not_found(short_code))?;

        self.cache.put_destination(short_code, resolved.clone());
        debug!(short_code, link_id = %resolved.link_id, "Resolved from store");

        Ok(resolved)
    }

    /// Lists the owner's links, newest first.
    ///
    /// On a miss the full list is fetched and cached as one value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn list_links(&self, owner_id: Uuid) -> Result<Arc<Vec<Link>>, AppError> {
        if let Some(links) = self.cache.get_owner_links(owner_id) {
            return Ok(links);
        }

        let links = Arc::new(self.link_repository.list_by_owner(owner_id).await?);
        self.cache.put_owner_links(owner_id, links.clone());

        Ok(links)
    }

    /// Creates a link for `owner_id` with a freshly generated short code.
    ///
    /// If the owner's list is cached, the new link is added to it in place
    /// rather than dropping the cached list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the slug or destination is invalid.
    /// Returns [`AppError::Conflict`] if the owner already uses the slug.
    /// Returns [`AppError::Internal`] if no unused short code was found or on store errors.
    pub async fn create_link(
        &self,
        owner_id: Uuid,
        slug: &str,
        destination: &str,
    ) -> Result<Link, AppError> {
        validate_slug(slug)?;
        let destination = validate_destination(destination)?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let short_code = generate_code()?;

            if self.link_repository.short_code_exists(&short_code).await? {
                continue;
            }

            let new_link = NewLink::new(
                owner_id,
                slug.to_string(),
                short_code,
                destination.as_str().to_string(),
            );

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    let extended = self.cache.extend_owner_links(owner_id, link.clone());
                    info!(
                        %owner_id,
                        slug,
                        short_code = %link.short_code,
                        cache_extended = extended,
                        "Link created"
                    );
                    return Ok(link);
                }
                Err(e) if e.constraint() == Some(SHORT_CODE_CONSTRAINT) => continue,
                Err(e) if e.constraint() == Some(SLUG_CONSTRAINT) => {
                    return Err(AppError::slug_already_exists(slug));
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Retrieves one of the owner's links by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner has no link with this slug.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get_link_by_slug(&self, owner_id: Uuid, slug: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_slug(owner_id, slug)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "slug": slug })))
    }

    /// Checks that the store answers.
    ///
    /// # Errors
    ///
    /// Returns the store error when it does not.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    pub fn cache(&self) -> &dyn LinkCache {
        self.cache.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{MokaLinkCache, NullCache};
    use chrono::Utc;

    fn resolved(url: &str) -> ResolvedLink {
        ResolvedLink {
            link_id: Uuid::new_v4(),
            destination: url.to_string(),
        }
    }

    fn stored_link(owner_id: Uuid, slug: &str) -> Link {
        Link {
            id: Uuid::new_v4(),
            owner_id,
            slug: slug.to_string(),
            short_code: format!("code-{slug}"),
            destination: format!("https://example.com/{slug}"),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn moka() -> Arc<MokaLinkCache> {
        Arc::new(MokaLinkCache::new(100))
    }

    fn conflict(constraint: &str) -> AppError {
        AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": constraint }),
        )
    }

    #[tokio::test]
    async fn test_second_resolve_is_served_from_cache() {
        let mut mock_link_repo = MockLinkRepository::new();
        let value = resolved("https://example.com/target");
        let returned = value.clone();

        mock_link_repo
            .expect_find_active_by_short_code()
            .withf(|code| code == "s1")
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = LinkService::new(Arc::new(mock_link_repo), moka());

        let first = service.resolve("s1").await.unwrap();
        let second = service.resolve("s1").await.unwrap();

        assert_eq!(first, value);
        assert_eq!(second, value);
    }

    #[tokio::test]
    async fn test_resolve_miss_leaves_cache_untouched() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_active_by_short_code()
            .times(1)
            .returning(|_| Ok(None));

        let cache = moka();
        let service = LinkService::new(Arc::new(mock_link_repo), cache.clone());

        let err = service.resolve("missing").await.unwrap_err();

        assert!(err.is_not_found());
        assert!(cache.get_destination("missing").is_none());
        assert_eq!(cache.stats().destinations, 0);
    }

    #[tokio::test]
    async fn test_resolve_without_cache_always_queries_store() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_active_by_short_code()
            .times(2)
            .returning(|_| Ok(Some(resolved("https://example.com"))));

        let service = LinkService::new(Arc::new(mock_link_repo), Arc::new(NullCache));

        service.resolve("s1").await.unwrap();
        service.resolve("s1").await.unwrap();
    }

    #[tokio::test]
    async fn test_resolve_propagates_store_failure() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_active_by_short_code()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = LinkService::new(Arc::new(mock_link_repo), moka());

        let err = service.resolve("s1").await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_list_links_caches_full_list() {
        let owner = Uuid::new_v4();
        let links = vec![stored_link(owner, "b"), stored_link(owner, "a")];
        let returned = links.clone();

        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_list_by_owner()
            .withf(move |id| *id == owner)
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let service = LinkService::new(Arc::new(mock_link_repo), moka());

        assert_eq!(service.list_links(owner).await.unwrap().as_slice(), links.as_slice());
        assert_eq!(service.list_links(owner).await.unwrap().as_slice(), links.as_slice());
    }

    #[tokio::test]
    async fn test_create_link_extends_cached_list_without_refetch() {
        let owner = Uuid::new_v4();
        let existing = stored_link(owner, "a");
        let listed = vec![existing.clone()];

        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_list_by_owner()
            .times(1)
            .returning(move |_| Ok(listed.clone()));
        mock_link_repo
            .expect_short_code_exists()
            .times(1)
            .returning(|_| Ok(false));
        mock_link_repo
            .expect_create()
            .withf(move |new_link| new_link.owner_id == owner && new_link.slug == "b")
            .times(1)
            .returning(|new_link| {
                Ok(Link {
                    id: new_link.id,
                    owner_id: new_link.owner_id,
                    slug: new_link.slug,
                    short_code: new_link.short_code,
                    destination: new_link.destination,
                    is_active: true,
                    created_at: Utc::now(),
                })
            });

        let service = LinkService::new(Arc::new(mock_link_repo), moka());

        service.list_links(owner).await.unwrap();
        let created = service
            .create_link(owner, "b", "https://example.com/b")
            .await
            .unwrap();

        let links = service.list_links(owner).await.unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0], created);
        assert_eq!(links[1], existing);
    }

    #[tokio::test]
    async fn test_create_link_retries_on_short_code_collision() {
        let owner = Uuid::new_v4();
        let mut mock_link_repo = MockLinkRepository::new();

        let mut exists_calls = 0;
        mock_link_repo
            .expect_short_code_exists()
            .times(3)
            .returning(move |_| {
                exists_calls += 1;
                Ok(exists_calls == 1)
            });

        let mut create_calls = 0;
        mock_link_repo
            .expect_create()
            .times(2)
            .returning(move |new_link| {
                create_calls += 1;
                if create_calls == 1 {
                    return Err(conflict(SHORT_CODE_CONSTRAINT));
                }
                Ok(Link {
                    id: new_link.id,
                    owner_id: new_link.owner_id,
                    slug: new_link.slug,
                    short_code: new_link.short_code,
                    destination: new_link.destination,
                    is_active: true,
                    created_at: Utc::now(),
                })
            });

        let service = LinkService::new(Arc::new(mock_link_repo), Arc::new(NullCache));

        let link = service
            .create_link(owner, "promo", "https://example.com")
            .await
            .unwrap();
        assert_eq!(link.short_code.len(), 12);
    }

    #[tokio::test]
    async fn test_create_link_slug_conflict() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_short_code_exists()
            .times(1)
            .returning(|_| Ok(false));
        mock_link_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(conflict(SLUG_CONSTRAINT)));

        let service = LinkService::new(Arc::new(mock_link_repo), moka());

        let err = service
            .create_link(Uuid::new_v4(), "taken", "https://example.com")
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Slug already exists for this user");
    }

    #[tokio::test]
    async fn test_create_link_validates_before_store_access() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo.expect_short_code_exists().times(0);
        mock_link_repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(mock_link_repo), moka());
        let owner = Uuid::new_v4();

        let bad_slug = service.create_link(owner, "no spaces", "https://example.com").await;
        let bad_url = service.create_link(owner, "ok", "not-a-url").await;

        assert!(matches!(bad_slug, Err(AppError::Validation { .. })));
        assert!(matches!(bad_url, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_link_gives_up_after_repeated_collisions() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_short_code_exists()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|_| Ok(true));
        mock_link_repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(mock_link_repo), moka());

        let err = service
            .create_link(Uuid::new_v4(), "promo", "https://example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_get_link_by_slug_not_found() {
        let mut mock_link_repo = MockLinkRepository::new();
        mock_link_repo
            .expect_find_by_slug()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = LinkService::new(Arc::new(mock_link_repo), moka());

        let err = service
            .get_link_by_slug(Uuid::new_v4(), "a")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
