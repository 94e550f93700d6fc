//! Type-scoped full-text search for Tracker
//!
//! A raw query flows through four stages:
//!
//! 1. [`query::parse`] splits it into free-text terms and `type:` filters.
//! 2. [`hierarchy::resolve`] expands the filters into their descendant closure.
//! 3. [`executor::execute`] counts and pages the matching work items with
//!    `SQLite` FTS5.
//! 4. [`SearchRepository`] ties the stages together, applies pagination
//!    policy, and honours cancellation.

pub mod context;
pub mod executor;
pub mod hierarchy;
pub mod query;
mod repository;


pub use context::SearchContext;
pub use executor::{Pagination, SearchResult};
pub use hierarchy::{resolve, TypeCatalog, TypeClosure, TypeForest};
pub use query::{parse, ParsedQuery, TypeFilterSet};
pub use repository::SearchRepository;
