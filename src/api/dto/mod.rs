//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod analytics;
pub mod health;
pub mod links;
pub mod metrics;
pub mod redirect;

use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;

/// Parses the `id` query parameter naming the owner.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when the parameter is missing or not a UUID.
pub fn parse_owner_id(id: Option<&str>) -> Result<Uuid, AppError> {
    let raw = id
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing user id", json!({ "param": "id" })))?;

    Uuid::parse_str(raw)
        .map_err(|_| AppError::bad_request("Invalid user id", json!({ "id": raw })))
}
