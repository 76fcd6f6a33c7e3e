//! Handler for short link redirects.

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{debug, warn};

use crate::api::dto::redirect::RedirectQuery;
use crate::domain::click_event::ClickEvent;
use crate::domain::platform::deep_link_for;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_info::{client_ip, country, header_str};
use crate::utils::code_generator::is_valid_short_code;
use crate::utils::device::device_type;

/// Redirects a short code to its destination, or to an app deep link.
///
/// # Endpoint
///
/// `GET /r/{short_code}`
///
/// # Request Flow
///
/// 1. Validate the short code
/// 2. Resolve it through the cache, falling back to the store
/// 3. Pick an app URI for the client's platform when the destination
///    belongs to a known service
/// 4. Queue a click event for the background worker
/// 5. Return 302 Found
///
/// Click tracking never delays or fails the redirect. When the queue is full
/// the event is dropped and counted.
///
/// # Errors
///
/// Returns 400 Bad Request if the short code is malformed.
/// Returns 404 Not Found if no active link has this short code.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    Query(query): Query<RedirectQuery>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    if !is_valid_short_code(&short_code) {
        return Err(AppError::bad_request(
            "Invalid short code",
            json!({ "short_code": short_code }),
        ));
    }

    let resolved = state.link_service.resolve(&short_code).await?;

    let user_agent = header_str(&headers, header::USER_AGENT.as_str());
    let target = deep_link_for(user_agent.unwrap_or_default(), &resolved.destination);

    let event = ClickEvent {
        short_code,
        ip: Some(client_ip(&headers, addr, state.behind_proxy)),
        referrer: header_str(&headers, header::REFERER.as_str()).map(str::to_string),
        user_agent: user_agent.map(str::to_string),
        device_type: user_agent.and_then(device_type).map(str::to_string),
        country: country(&headers),
        conversion: query.conversion(),
        high_value: query.high_value(),
    };

    if !state.click_queue.enqueue(event) {
        debug!(link_id = %resolved.link_id, "Redirect served without click tracking");
    }

    found(&target, &resolved.destination)
}

/// `GET /r` without a short code.
pub async fn missing_short_code_handler() -> AppError {
    AppError::bad_request("Missing short code", json!({}))
}

/// Builds the 302 response, falling back to `destination` when `deep_link` is
/// not a valid header value.
fn found(deep_link: &str, destination: &str) -> Result<Response, AppError> {
    let location = HeaderValue::from_str(deep_link)
        .or_else(|_| {
            warn!(deep_link, "Deep link is not a valid Location, using destination");
            HeaderValue::from_str(destination)
        })
        .map_err(|_| {
            AppError::internal("Invalid redirect target", json!({ "location": destination }))
        })?;

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, location),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
    )
        .into_response())
}
