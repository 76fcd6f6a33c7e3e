//! Handler for owner analytics views.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::api::dto::analytics::{
    AnalyticsQuery, AnalyticsView, ClickItem, DailyClicksItem, GroupedCountItem,
};
use crate::api::dto::parse_owner_id;
use crate::domain::entities::GroupDimension;
use crate::error::AppError;
use crate::state::AppState;

/// Returns one analytics view over all of the owner's links.
///
/// # Endpoint
///
/// `GET /analytics?id={userID}&view={view}`
///
/// # Views
///
/// - `per-day` - clicks per UTC day over the trailing seven days
/// - `by-country` - clicks grouped by country, `unknown` when absent
/// - `by-device` - clicks grouped by device type, `unknown` when absent
/// - `recent` - latest clicks, `limit` 1-100 (default 20)
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is missing or not a UUID, or if the
/// `recent` view gets a non-integer `limit`.
/// Returns 404 Not Found for a missing or unknown view.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Response, AppError> {
    let owner_id = parse_owner_id(query.id.as_deref())?;

    let view = query
        .view
        .as_deref()
        .and_then(AnalyticsView::parse)
        .ok_or_else(|| {
            AppError::not_found("Unknown analytics view", json!({ "view": query.view }))
        })?;

    debug!(%owner_id, ?view, "Analytics request");

    let analytics = &state.analytics_service;

    let response = match view {
        AnalyticsView::PerDay => {
            let rows = analytics.clicks_per_day(owner_id).await?;
            Json(rows.iter().map(DailyClicksItem::from).collect::<Vec<_>>()).into_response()
        }
        AnalyticsView::ByCountry => grouped(&state, owner_id, GroupDimension::Country)
            .await?
            .into_response(),
        AnalyticsView::ByDevice => grouped(&state, owner_id, GroupDimension::Device)
            .await?
            .into_response(),
        AnalyticsView::Recent => {
            let clicks = analytics.recent_clicks(owner_id, query.limit()?).await?;
            Json(clicks.into_iter().map(ClickItem::from).collect::<Vec<_>>()).into_response()
        }
    };

    Ok(response)
}

async fn grouped(
    state: &AppState,
    owner_id: uuid::Uuid,
    dimension: GroupDimension,
) -> Result<Json<Vec<GroupedCountItem>>, AppError> {
    let rows = state.analytics_service.grouped(owner_id, dimension).await?;
    Ok(Json(rows.into_iter().map(GroupedCountItem::from).collect()))
}
