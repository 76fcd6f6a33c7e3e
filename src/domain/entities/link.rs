//! Link entity representing a short link owned by a user.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored short link.
///
/// The `short_code` is globally unique and immutable once assigned. The `slug`
/// is chosen by the owner and is unique only within that owner's links.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Link {
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub owner_id: Uuid,
    pub slug: String,
    pub short_code: String,
    pub destination: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// The part of the link the resolver caches per short code.
    pub fn resolved(&self) -> ResolvedLink {
        ResolvedLink {
            link_id: self.id,
            destination: self.destination.clone(),
        }
    }
}

/// Outcome of resolving a short code: where to send the client and which link was hit.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ResolvedLink {
    #[sqlx(rename = "id")]
    pub link_id: Uuid,
    pub destination: String,
}

/// Input data for creating a new link.
///
/// The identifier is generated by the caller; `is_active` defaults to true and
/// `created_at` is set by the database.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub slug: String,
    pub short_code: String,
    pub destination: String,
}

impl NewLink {
    pub fn new(owner_id: Uuid, slug: String, short_code: String, destination: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            slug,
            short_code,
            destination,
        }
    }
}
