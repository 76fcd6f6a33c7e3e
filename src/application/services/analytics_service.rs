//! Owner-scoped click analytics.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::domain::entities::{Click, DailyClicks, GroupDimension, GroupedCount};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Days covered by the per-day view, including today.
pub const DAILY_WINDOW_DAYS: i64 = 7;

pub const DEFAULT_RECENT_LIMIT: i64 = 20;
pub const MAX_RECENT_LIMIT: i64 = 100;

/// Aggregates the click history of one owner's links.
///
/// No query ever mixes owners, except [`AnalyticsService::click_count`] which
/// is keyed by short code alone.
pub struct AnalyticsService<C: ClickRepository + ?Sized> {
    click_repository: Arc<C>,
}

impl<C: ClickRepository + ?Sized> AnalyticsService<C> {
    /// Creates a new analytics service.
    pub fn new(click_repository: Arc<C>) -> Self {
        Self { click_repository }
    }

    /// Clicks per UTC day over the trailing seven days, ascending by date.
    ///
    /// Days without clicks are absent from the result; callers needing a
    /// continuous series must fill the gaps.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn clicks_per_day(&self, owner_id: Uuid) -> Result<Vec<DailyClicks>, AppError> {
        self.clicks_per_day_until(owner_id, Utc::now().date_naive())
            .await
    }

    /// Same as [`Self::clicks_per_day`], with `today` supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn clicks_per_day_until(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<DailyClicks>, AppError> {
        let (from, until) = daily_window(today);
        self.click_repository
            .daily_counts(owner_id, from, until)
            .await
    }

    /// Click counts grouped by device type or country.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn grouped(
        &self,
        owner_id: Uuid,
        dimension: GroupDimension,
    ) -> Result<Vec<GroupedCount>, AppError> {
        self.click_repository
            .grouped_counts(owner_id, dimension)
            .await
    }

    /// Total clicks on the link with this short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn click_count(&self, short_code: &str) -> Result<i64, AppError> {
        self.click_repository.count_by_short_code(short_code).await
    }

    /// Total clicks on all of the owner's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn total_clicks(&self, owner_id: Uuid) -> Result<i64, AppError> {
        self.click_repository.count_by_owner(owner_id).await
    }

    /// The owner's latest clicks. `limit` defaults to 20 and is clamped to 1-100.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn recent_clicks(
        &self,
        owner_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Click>, AppError> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);
        self.click_repository.recent_by_owner(owner_id, limit).await
    }
}

/// `[today - 6 days 00:00 UTC, tomorrow 00:00 UTC)`.
fn daily_window(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let first_day = today - Duration::days(DAILY_WINDOW_DAYS - 1);
    let day_after = today + Duration::days(1);

    (
        first_day.and_time(NaiveTime::MIN).and_utc(),
        day_after.and_time(NaiveTime::MIN).and_utc(),
    )
}
