//! Repository trait for link data access.

use crate::domain::entities::{Link, NewLink, ResolvedLink};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for stored links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] carrying the violated constraint name when
    /// the slug is taken for this owner or the short code is taken globally.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds the active link with this short code.
    ///
    /// Inactive links are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<ResolvedLink>, AppError>;

    /// Finds one of the owner's links by slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_slug(&self, owner_id: Uuid, slug: &str) -> Result<Option<Link>, AppError>;

    /// Lists all of the owner's links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError>;

    /// Whether any link (active or not) already uses this short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn short_code_exists(&self, short_code: &str) -> Result<bool, AppError>;

    /// Round-trips to the store. Used by health checks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
