//! Handlers for owner link management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse, OwnerQuery};
use crate::api::dto::parse_owner_id;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the owner's links, newest first.
///
/// # Endpoint
///
/// `GET /links?id={userID}`
///
/// Served from the cache after the first request; links created through this
/// service are added to the cached list without a refetch.
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is missing or not a UUID.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let owner_id = parse_owner_id(query.id.as_deref())?;
    let links = state.link_service.list_links(owner_id).await?;

    Ok(Json(links.iter().map(LinkResponse::from).collect()))
}

/// Creates a link for the owner with a generated short code.
///
/// # Endpoint
///
/// `POST /links?id={userID}`
///
/// # Request Body
///
/// ```json
/// { "slug": "spring-promo", "destination": "https://open.spotify.com/track/abc" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request on an invalid owner, slug or destination.
/// Returns 409 Conflict if the owner already uses the slug.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let owner_id = parse_owner_id(query.id.as_deref())?;
    payload.validate()?;

    let link = state
        .link_service
        .create_link(owner_id, &payload.slug, &payload.destination)
        .await?;

    Ok((StatusCode::CREATED, Json(LinkResponse::from(&link))))
}

/// Returns one of the owner's links by slug.
///
/// # Endpoint
///
/// `GET /links/{slug}?id={userID}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<LinkResponse>, AppError> {
    let owner_id = parse_owner_id(query.id.as_deref())?;
    let link = state.link_service.get_link_by_slug(owner_id, &slug).await?;

    Ok(Json(LinkResponse::from(&link)))
}
