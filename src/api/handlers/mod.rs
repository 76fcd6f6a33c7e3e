//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod health;
pub mod links;
pub mod metrics;
pub mod redirect;

pub use analytics::analytics_handler;
pub use health::health_handler;
pub use links::{create_link_handler, get_link_handler, list_links_handler};
pub use metrics::click_count_handler;
pub use redirect::{missing_short_code_handler, redirect_handler};
