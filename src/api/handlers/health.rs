//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Round-trip through the link store
/// 2. **Click Queue**: Channel open, capacity and dropped events
/// 3. **Cache**: Backend and entry counts
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "click_queue": { "status": "ok", "message": "Capacity: 10000, available: 9998, dropped: 0" },
///     "cache": { "status": "ok", "message": "moka: 12 destinations, 3 owner lists, capacity 10000" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let db_check = check_database(&state).await;

    let queue_check = check_click_queue(&state);

    let cache_check = check_cache(&state);

    let all_healthy = db_check.is_ok() && queue_check.is_ok() && cache_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            click_queue: queue_check,
            cache: cache_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.link_service.check_store().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

/// The queue is healthy while the worker holds the receiving end.
fn check_click_queue(state: &AppState) -> CheckStatus {
    let queue = &state.click_queue;

    if queue.is_closed() {
        CheckStatus::error(format!(
            "Click queue is closed, dropped: {}",
            queue.dropped()
        ))
    } else {
        CheckStatus::ok(format!(
            "Capacity: {}, available: {}, dropped: {}",
            queue.capacity(),
            queue.available(),
            queue.dropped()
        ))
    }
}

fn check_cache(state: &AppState) -> CheckStatus {
    let cache = state.link_service.cache();
    let stats = cache.stats();

    CheckStatus::ok(format!(
        "{}: {} destinations, {} owner lists, capacity {}",
        cache.backend(),
        stats.destinations,
        stats.owner_lists,
        stats.capacity
    ))
}
