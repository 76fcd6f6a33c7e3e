//! In-memory implementation of both repositories.
//!
//! Backs integration tests and local runs without PostgreSQL. Every trait call
//! is counted per operation so tests can assert how many store round-trips a
//! code path made.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::entities::{
    Click, DailyClicks, GroupDimension, GroupedCount, Link, NewClick, NewLink, ResolvedLink,
};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::{AppError, SHORT_CODE_CONSTRAINT, SLUG_CONSTRAINT};

#[derive(Default)]
struct Tables {
    links: Vec<Link>,
    clicks: Vec<Click>,
}

/// Mutex-guarded store implementing [`LinkRepository`] and [`ClickRepository`].
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the named trait method has been called.
    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total trait calls across all operations.
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.values().sum())
            .unwrap_or(0)
    }

    /// Inserts a link directly, bypassing constraints and call counting.
    pub fn insert_link(&self, link: Link) -> Result<(), AppError> {
        self.tables()?.links.push(link);
        Ok(())
    }

    /// Inserts a click directly, bypassing call counting.
    pub fn insert_click(&self, click: Click) -> Result<(), AppError> {
        self.tables()?.clicks.push(click);
        Ok(())
    }

    /// Marks a link active or inactive.
    pub fn set_active(&self, short_code: &str, active: bool) -> Result<(), AppError> {
        if let Some(link) = self
            .tables()?
            .links
            .iter_mut()
            .find(|l| l.short_code == short_code)
        {
            link.is_active = active;
        }
        Ok(())
    }

    /// All stored clicks, in insertion order.
    pub fn clicks(&self) -> Result<Vec<Click>, AppError> {
        Ok(self.tables()?.clicks.clone())
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::internal("Store unavailable", json!({ "reason": "mutex poisoned" })))
    }

    fn track(&self, operation: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(operation).or_default() += 1;
        }
    }
}

impl Tables {
    fn owner_link_ids(&self, owner_id: Uuid) -> Vec<Uuid> {
        self.links
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .map(|l| l.id)
            .collect()
    }

    fn owner_clicks(&self, owner_id: Uuid) -> impl Iterator<Item = &Click> {
        let ids = self.owner_link_ids(owner_id);
        self.clicks.iter().filter(move |c| ids.contains(&c.link_id))
    }
}

fn unique_violation(constraint: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": constraint }),
    )
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.track("create");
        let mut tables = self.tables()?;

        if tables
            .links
            .iter()
            .any(|l| l.owner_id == new_link.owner_id && l.slug == new_link.slug)
        {
            return Err(unique_violation(SLUG_CONSTRAINT));
        }
        if tables
            .links
            .iter()
            .any(|l| l.short_code == new_link.short_code)
        {
            return Err(unique_violation(SHORT_CODE_CONSTRAINT));
        }

        let link = Link {
            id: new_link.id,
            owner_id: new_link.owner_id,
            slug: new_link.slug,
            short_code: new_link.short_code,
            destination: new_link.destination,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.links.push(link.clone());

        Ok(link)
    }

    async fn find_active_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<ResolvedLink>, AppError> {
        self.track("find_active_by_short_code");
        Ok(self
            .tables()?
            .links
            .iter()
            .find(|l| l.short_code == short_code && l.is_active)
            .map(Link::resolved))
    }

    async fn find_by_slug(&self, owner_id: Uuid, slug: &str) -> Result<Option<Link>, AppError> {
        self.track("find_by_slug");
        Ok(self
            .tables()?
            .links
            .iter()
            .find(|l| l.owner_id == owner_id && l.slug == slug)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        self.track("list_by_owner");
        let mut links: Vec<Link> = self
            .tables()?
            .links
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(links)
    }

    async fn short_code_exists(&self, short_code: &str) -> Result<bool, AppError> {
        self.track("short_code_exists");
        Ok(self
            .tables()?
            .links
            .iter()
            .any(|l| l.short_code == short_code))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.track("ping");
        self.tables().map(|_| ())
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record(&self, click: NewClick) -> Result<Option<Click>, AppError> {
        self.track("record");
        let mut tables = self.tables()?;

        let Some(link_id) = tables
            .links
            .iter()
            .find(|l| l.short_code == click.short_code)
            .map(|l| l.id)
        else {
            return Ok(None);
        };

        let stored = Click {
            id: Uuid::new_v4(),
            link_id,
            ip: click.ip,
            referrer: click.referrer,
            user_agent: click.user_agent,
            device_type: click.device_type,
            country: click.country,
            conversion: click.conversion,
            high_value: click.high_value,
            created_at: Utc::now(),
        };
        tables.clicks.push(stored.clone());

        Ok(Some(stored))
    }

    async fn count_by_short_code(&self, short_code: &str) -> Result<i64, AppError> {
        self.track("count_by_short_code");
        let tables = self.tables()?;

        let ids: Vec<Uuid> = tables
            .links
            .iter()
            .filter(|l| l.short_code == short_code)
            .map(|l| l.id)
            .collect();

        Ok(tables
            .clicks
            .iter()
            .filter(|c| ids.contains(&c.link_id))
            .count() as i64)
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError> {
        self.track("count_by_owner");
        Ok(self.tables()?.owner_clicks(owner_id).count() as i64)
    }

    async fn daily_counts(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<DailyClicks>, AppError> {
        self.track("daily_counts");
        let tables = self.tables()?;

        let mut days = BTreeMap::new();
        for click in tables
            .owner_clicks(owner_id)
            .filter(|c| c.created_at >= from && c.created_at < until)
        {
            *days.entry(click.created_at.date_naive()).or_insert(0i64) += 1;
        }

        Ok(days
            .into_iter()
            .map(|(date, clicks)| DailyClicks { date, clicks })
            .collect())
    }

    async fn grouped_counts(
        &self,
        owner_id: Uuid,
        dimension: GroupDimension,
    ) -> Result<Vec<GroupedCount>, AppError> {
        self.track("grouped_counts");
        let tables = self.tables()?;

        let mut groups: HashMap<String, i64> = HashMap::new();
        for click in tables.owner_clicks(owner_id) {
            let value = match dimension {
                GroupDimension::Device => click.device_type.as_deref(),
                GroupDimension::Country => click.country.as_deref(),
            };
            let label = value
                .filter(|v| !v.is_empty())
                .unwrap_or(GroupedCount::UNKNOWN);
            *groups.entry(label.to_string()).or_default() += 1;
        }

        let mut rows: Vec<GroupedCount> = groups
            .into_iter()
            .map(|(label, count)| GroupedCount { label, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

        Ok(rows)
    }

    async fn recent_by_owner(&self, owner_id: Uuid, limit: i64) -> Result<Vec<Click>, AppError> {
        self.track("recent_by_owner");
        let tables = self.tables()?;

        let mut clicks: Vec<Click> = tables.owner_clicks(owner_id).cloned().collect();
        clicks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        clicks.truncate(usize::try_from(limit).unwrap_or(0));

        Ok(clicks)
    }
}
