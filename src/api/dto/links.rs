//! DTOs for link listing and creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::Link;
use crate::utils::code_generator::CODE_REGEX;

/// `?id={userID}` selecting the owner whose links are addressed.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub id: Option<String>,
}

/// Request to create a link.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 64))]
    #[validate(regex(path = *CODE_REGEX))]
    pub slug: String,

    /// The URL to redirect to (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub destination: String,
}

/// A link as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub slug: String,
    pub short_code: String,
    pub destination: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Link> for LinkResponse {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id,
            slug: link.slug.clone(),
            short_code: link.short_code.clone(),
            destination: link.destination.clone(),
            is_active: link.is_active,
            created_at: link.created_at,
        }
    }
}
