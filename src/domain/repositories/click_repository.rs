//! Repository trait for click recording and aggregation.

use crate::domain::entities::{Click, DailyClicks, GroupDimension, GroupedCount, NewClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository interface for the append-only click history.
///
/// All owner-scoped queries cover every link the owner has, active or not.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends a click, resolving `short_code` to its link inside the write.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Click))` when the click was stored
    /// - `Ok(None)` when no link has this short code
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn record(&self, click: NewClick) -> Result<Option<Click>, AppError>;

    /// Total clicks on the link with this short code, regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_short_code(&self, short_code: &str) -> Result<i64, AppError>;

    /// Total clicks on all of the owner's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError>;

    /// Clicks per UTC day for `from <= created_at < until`, ascending by date.
    ///
    /// Days without clicks are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn daily_counts(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<DailyClicks>, AppError>;

    /// Clicks grouped by `dimension`, largest count first, ties by label.
    ///
    /// Null and empty values are counted under [`GroupedCount::UNKNOWN`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn grouped_counts(
        &self,
        owner_id: Uuid,
        dimension: GroupDimension,
    ) -> Result<Vec<GroupedCount>, AppError>;

    /// The owner's most recent clicks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn recent_by_owner(&self, owner_id: Uuid, limit: i64) -> Result<Vec<Click>, AppError>;
}
