//! tracker-core - Core library for Tracker
//!
//! This crate contains the work item models, the `SQLite` storage layer, and
//! the type-scoped full-text search engine used by the Tracker CLI.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod search;

pub use error::{Error, Result};
pub use models::{SpaceId, WorkItem, WorkItemId, WorkItemState, WorkItemType, WorkItemTypeId};
pub use search::{SearchContext, SearchRepository, SearchResult};
