//! Click event model for asynchronous click tracking.

use crate::domain::entities::NewClick;

/// An in-memory click awaiting persistence.
///
/// Built by the redirect handler from request metadata and handed to the
/// [`crate::domain::click_worker::ClickQueue`]. The event carries the short
/// code rather than a link identifier: the recorder resolves it again against
/// the store when writing.
///
/// All client metadata is optional to handle missing headers gracefully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickEvent {
    pub short_code: String,
    pub ip: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
    pub country: Option<String>,
    pub conversion: bool,
    pub high_value: bool,
}

impl ClickEvent {
    /// Creates an event for `short_code` with no metadata.
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
            ..Self::default()
        }
    }
}

impl From<ClickEvent> for NewClick {
    fn from(event: ClickEvent) -> Self {
        NewClick {
            short_code: event.short_code,
            ip: event.ip,
            referrer: event.referrer,
            user_agent: event.user_agent,
            device_type: event.device_type,
            country: event.country,
            conversion: event.conversion,
            high_value: event.high_value,
        }
    }
}
