//! Short code generation and validation utilities.
//!
//! Provides cryptographically secure random code generation and validation
//! of owner-chosen slugs, short codes and destinations.

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of random bytes before base64 encoding.
const CODE_LENGTH_BYTES: usize = 9;

/// Upper bound for slugs and short codes.
pub const MAX_CODE_LENGTH: usize = 64;

/// Slugs and short codes share one character set.
pub static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid code regex"));

/// Generates a cryptographically secure random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 12-character code.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate short code",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Whether `code` has the shape of a short code: 1-64 of `[A-Za-z0-9_-]`.
pub fn is_valid_short_code(code: &str) -> bool {
    code.len() <= MAX_CODE_LENGTH && CODE_REGEX.is_match(code)
}

/// Validates an owner-chosen slug.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() || slug.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Slug must be 1-64 characters",
            json!({ "provided_length": slug.len() }),
        ));
    }

    if !CODE_REGEX.is_match(slug) {
        return Err(AppError::bad_request(
            "Slug can only contain letters, digits, hyphens, and underscores",
            json!({ "slug": slug }),
        ));
    }

    Ok(())
}

/// Validates a link destination: an absolute `http` or `https` URL with a host.
///
/// Returns the parsed URL. Its serialization is what gets stored, since
/// parsing drops tabs and newlines that would not survive a `Location` header.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the URL does not parse or has the wrong scheme.
pub fn validate_destination(destination: &str) -> Result<url::Url, AppError> {
    let url = url::Url::parse(destination).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::bad_request(
            "Destination must be an http or https URL",
            json!({ "destination": destination }),
        ));
    }

    Ok(url)
}
