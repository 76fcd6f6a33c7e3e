//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`Link`] - A short link owned by a user
//! - [`Click`] - A recorded redirect on a link
//! - [`DailyClicks`], [`GroupedCount`] - Analytics aggregation rows
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! `NewLink` and `NewClick` carry only what the caller supplies; identifiers
//! and timestamps of stored rows come back in `Link` and `Click`.

pub mod analytics;
pub mod click;
pub mod link;

pub use analytics::{DailyClicks, GroupDimension, GroupedCount};
pub use click::{Click, NewClick};
pub use link::{Link, NewLink, ResolvedLink};
