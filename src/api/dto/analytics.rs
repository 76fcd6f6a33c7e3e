//! DTOs for the analytics surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::skip_serializing_none;
use uuid::Uuid;

use crate::domain::entities::{Click, DailyClicks, GroupedCount};
use crate::error::AppError;

/// Query parameters for `GET /analytics`.
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub id: Option<String>,
    pub view: Option<String>,

    /// Only used by the `recent` view. Kept raw so other views ignore it.
    pub limit: Option<String>,
}

impl AnalyticsQuery {
    /// Parses `limit`; absent or blank means the default.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `limit` is not an integer.
    pub fn limit(&self) -> Result<Option<i64>, AppError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                AppError::bad_request("Invalid limit", json!({ "limit": raw }))
            }),
        }
    }
}

/// Selectable analytics views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsView {
    PerDay,
    ByCountry,
    ByDevice,
    Recent,
}

impl AnalyticsView {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "per-day" => Some(Self::PerDay),
            "by-country" => Some(Self::ByCountry),
            "by-device" => Some(Self::ByDevice),
            "recent" => Some(Self::Recent),
            _ => None,
        }
    }
}

/// One day of the per-day view.
#[derive(Debug, Serialize)]
pub struct DailyClicksItem {
    /// `YYYY-MM-DD`
    pub date: String,
    /// Abbreviated weekday, e.g. `Mon`.
    pub day: String,
    pub clicks: i64,
}

impl From<&DailyClicks> for DailyClicksItem {
    fn from(row: &DailyClicks) -> Self {
        Self {
            date: row.date.format("%Y-%m-%d").to_string(),
            day: row.date.format("%a").to_string(),
            clicks: row.clicks,
        }
    }
}

/// One bucket of a grouped view.
#[derive(Debug, Serialize)]
pub struct GroupedCountItem {
    pub label: String,
    pub count: i64,
}

impl From<GroupedCount> for GroupedCountItem {
    fn from(row: GroupedCount) -> Self {
        Self {
            label: row.label,
            count: row.count,
        }
    }
}

/// One click of the recent view.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct ClickItem {
    pub id: Uuid,
    pub link_id: Uuid,
    pub created_at: DateTime<Utc>,

    pub ip: Option<String>,

    pub referrer: Option<String>,

    pub user_agent: Option<String>,

    pub device_type: Option<String>,

    pub country: Option<String>,

    pub conversion: bool,
    pub high_value: bool,
}

impl From<Click> for ClickItem {
    fn from(click: Click) -> Self {
        Self {
            id: click.id,
            link_id: click.link_id,
            created_at: click.created_at,
            ip: click.ip,
            referrer: click.referrer,
            user_agent: click.user_agent,
            device_type: click.device_type,
            country: click.country,
            conversion: click.conversion,
            high_value: click.high_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_view_parsing() {
        assert_eq!(AnalyticsView::parse("per-day"), Some(AnalyticsView::PerDay));
        assert_eq!(AnalyticsView::parse("by-country"), Some(AnalyticsView::ByCountry));
        assert_eq!(AnalyticsView::parse("by-device"), Some(AnalyticsView::ByDevice));
        assert_eq!(AnalyticsView::parse("recent"), Some(AnalyticsView::Recent));
        assert_eq!(AnalyticsView::parse("per_day"), None);
        assert_eq!(AnalyticsView::parse(""), None);
    }

    fn query(limit: Option<&str>) -> AnalyticsQuery {
        AnalyticsQuery {
            id: None,
            view: Some("recent".to_string()),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_limit_parsing() {
        assert_eq!(query(None).limit().unwrap(), None);
        assert_eq!(query(Some("")).limit().unwrap(), None);
        assert_eq!(query(Some("5")).limit().unwrap(), Some(5));
        assert_eq!(query(Some("-3")).limit().unwrap(), Some(-3));

        let err = query(Some("abc")).limit().unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_daily_item_formatting() {
        let row = DailyClicks {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            clicks: 3,
        };
        let item = DailyClicksItem::from(&row);

        assert_eq!(item.date, "2024-03-04");
        assert_eq!(item.day, "Mon");
        assert_eq!(item.clicks, 3);
    }
}
