//! Handler for the public click counter.

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;

use crate::api::dto::metrics::{ClickCountResponse, MetricsQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the total clicks recorded for one short code.
///
/// # Endpoint
///
/// `GET /metrics?short_code={code}`
///
/// An unknown short code reports zero.
///
/// # Errors
///
/// Returns 400 Bad Request if `short_code` is missing.
pub async fn click_count_handler(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<ClickCountResponse>, AppError> {
    let short_code = query
        .short_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| {
            AppError::bad_request("Missing short_code", json!({ "param": "short_code" }))
        })?;

    let click_count = state.analytics_service.click_count(short_code).await?;

    Ok(Json(ClickCountResponse { click_count }))
}
