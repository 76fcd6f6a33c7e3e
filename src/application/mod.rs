//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! caching, and validation. Services consume repository traits and provide a
//! clean API for HTTP handlers and the click worker.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Cache-backed resolution, listing and creation
//! - [`services::click_service::ClickService`] - Click recording
//! - [`services::analytics_service::AnalyticsService`] - Owner-scoped click aggregation

pub mod services;
