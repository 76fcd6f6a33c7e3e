//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the relational store behind the services. Concrete
//! implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link creation, lookup and per-owner listing
//! - [`ClickRepository`] - Click recording and analytics aggregation

pub mod click_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
