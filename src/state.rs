//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AnalyticsService, LinkService};
use crate::domain::click_worker::ClickQueue;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::cache::LinkCache;

/// State cloned into each request.
///
/// Services are held behind trait objects so the same router runs against
/// PostgreSQL in production and the in-memory store in tests.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn ClickRepository>>,
    pub click_queue: ClickQueue,
    /// Read client IPs from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        click_repository: Arc<dyn ClickRepository>,
        cache: Arc<dyn LinkCache>,
        click_queue: ClickQueue,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(link_repository, cache)),
            analytics_service: Arc::new(AnalyticsService::new(click_repository)),
            click_queue,
            behind_proxy,
        }
    }
}
