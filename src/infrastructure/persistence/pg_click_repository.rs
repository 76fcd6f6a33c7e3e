//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Click, DailyClicks, GroupDimension, GroupedCount, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// PostgreSQL repository for the click history and its aggregations.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, click: NewClick) -> Result<Option<Click>, AppError> {
        // Resolving the short code inside the INSERT keeps the store authoritative.
        let row = sqlx::query_as::<_, Click>(
            r#"
            INSERT INTO clicks
                (id, link_id, ip, referrer, user_agent, device_type, country, conversion, is_high_value)
            SELECT $1, l.id, $3, $4, $5, $6, $7, $8, $9
            FROM links l
            WHERE l.short_code = $2
            RETURNING id, link_id, ip, referrer, user_agent, device_type, country,
                      conversion, is_high_value, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&click.short_code)
        .bind(&click.ip)
        .bind(&click.referrer)
        .bind(&click.user_agent)
        .bind(&click.device_type)
        .bind(&click.country)
        .bind(click.conversion)
        .bind(click.high_value)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn count_by_short_code(&self, short_code: &str) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM clicks c
            JOIN links l ON l.id = c.link_id
            WHERE l.short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM clicks c
            JOIN links l ON l.id = c.link_id
            WHERE l.user_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn daily_counts(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<DailyClicks>, AppError> {
        let rows = sqlx::query_as::<_, DailyClicks>(
            r#"
            SELECT (c.created_at AT TIME ZONE 'UTC')::date AS date,
                   COUNT(*) AS clicks
            FROM clicks c
            JOIN links l ON l.id = c.link_id
            WHERE l.user_id = $1
              AND c.created_at >= $2
              AND c.created_at < $3
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(owner_id)
        .bind(from)
        .bind(until)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    async fn grouped_counts(
        &self,
        owner_id: Uuid,
        dimension: GroupDimension,
    ) -> Result<Vec<GroupedCount>, AppError> {
        // The column name comes from a closed enum, never from input.
        let sql = format!(
            r#"
            SELECT COALESCE(NULLIF(c.{column}, ''), '{unknown}') AS label,
                   COUNT(*) AS count
            FROM clicks c
            JOIN links l ON l.id = c.link_id
            WHERE l.user_id = $1
            GROUP BY 1
            ORDER BY count DESC, label
            "#,
            column = dimension.column(),
            unknown = GroupedCount::UNKNOWN,
        );

        let rows = sqlx::query_as::<_, GroupedCount>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows)
    }

    async fn recent_by_owner(&self, owner_id: Uuid, limit: i64) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, Click>(
            r#"
            SELECT c.id, c.link_id, c.ip, c.referrer, c.user_agent, c.device_type,
                   c.country, c.conversion, c.is_high_value, c.created_at
            FROM clicks c
            JOIN links l ON l.id = c.link_id
            WHERE l.user_id = $1
            ORDER BY c.created_at DESC, c.id
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }
}
