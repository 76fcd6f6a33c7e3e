//! DTOs for the public metrics endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub short_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClickCountResponse {
    pub click_count: i64,
}
