//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink, ResolvedLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = "id, user_id, slug, short_code, destination, is_active, created_at";

/// PostgreSQL repository for link storage and retrieval.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            "INSERT INTO links (id, user_id, slug, short_code, destination) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {LINK_COLUMNS}"
        );

        let link = sqlx::query_as::<_, Link>(&sql)
            .bind(new_link.id)
            .bind(new_link.owner_id)
            .bind(&new_link.slug)
            .bind(&new_link.short_code)
            .bind(&new_link.destination)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn find_active_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<ResolvedLink>, AppError> {
        let row = sqlx::query_as::<_, ResolvedLink>(
            "SELECT id, destination FROM links WHERE short_code = $1 AND is_active",
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn find_by_slug(&self, owner_id: Uuid, slug: &str) -> Result<Option<Link>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 AND slug = $2");

        let row = sqlx::query_as::<_, Link>(&sql)
            .bind(owner_id)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 ORDER BY created_at DESC, id"
        );

        let rows = sqlx::query_as::<_, Link>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows)
    }

    async fn short_code_exists(&self, short_code: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM links WHERE short_code = $1)",
        )
        .bind(short_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
