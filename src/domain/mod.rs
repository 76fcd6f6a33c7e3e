//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces, the deep-link classifier and the
//! click pipeline, independent of HTTP and storage concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`platform`] - User-agent and destination classification, deep-link synthesis
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Bounded click queue and its background worker
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the short code and answers immediately
//! 2. A [`click_event::ClickEvent`] is offered to [`click_worker::ClickQueue`] without waiting
//! 3. [`click_worker::run_click_worker`] records queued events with bounded concurrency
//! 4. Each click is persisted via [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod platform;
pub mod repositories;
