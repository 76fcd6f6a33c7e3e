//! Repository implementations.
//!
//! Concrete implementations of the domain repository traits: PostgreSQL via
//! SQLx runtime queries, and a mutex-guarded in-memory store.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage and retrieval
//! - [`PgClickRepository`] - Click recording and analytics queries
//! - [`InMemoryStore`] - Both traits over in-process vectors, with call counters

pub mod memory_store;
pub mod pg_click_repository;
pub mod pg_link_repository;

pub use memory_store::InMemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
