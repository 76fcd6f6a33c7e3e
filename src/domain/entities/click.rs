//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A click recorded when a short link is followed.
///
/// Append-only: clicks are never updated or deleted by the service.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Click {
    pub id: Uuid,
    pub link_id: Uuid,
    pub ip: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
    pub country: Option<String>,
    pub conversion: bool,
    #[sqlx(rename = "is_high_value")]
    pub high_value: bool,
    pub created_at: DateTime<Utc>,
}

/// Input data for recording a click.
///
/// Addressed by `short_code`: the store resolves it to a link identifier at
/// write time, independently of the resolution cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClick {
    pub short_code: String,
    pub ip: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
    pub country: Option<String>,
    pub conversion: bool,
    pub high_value: bool,
}
