//! API route configuration.
//!
//! Owner-scoped endpoints take the owner as `?id={userID}`; the caller is
//! authenticated upstream of this service.

use crate::api::handlers::{
    analytics_handler, click_count_handler, create_link_handler, get_link_handler,
    health_handler, list_links_handler, missing_short_code_handler, redirect_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All HTTP routes.
///
/// # Endpoints
///
/// - `GET  /r/{short_code}`   - Platform-aware redirect, records a click
/// - `GET  /links?id=`        - List the owner's links
/// - `POST /links?id=`        - Create a link
/// - `GET  /links/{slug}?id=` - One of the owner's links
/// - `GET  /analytics?id=&view=` - Per-day, by-country, by-device or recent clicks
/// - `GET  /metrics?short_code=` - Public click counter
/// - `GET  /health`           - Store, click queue and cache status
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/r", get(missing_short_code_handler))
        .route("/r/{short_code}", get(redirect_handler))
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route("/links/{slug}", get(get_link_handler))
        .route("/analytics", get(analytics_handler))
        .route("/metrics", get(click_count_handler))
        .route("/health", get(health_handler))
}
