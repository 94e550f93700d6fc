//! Database layer for Tracker

mod connection;
mod migrations;
mod repository;
mod type_repository;

pub use connection::Database;
pub use repository::{SqliteWorkItemRepository, WorkItemRepository};
pub(crate) use repository::{parse_work_item, WORK_ITEM_COLUMNS};
pub use type_repository::{SqliteWorkItemTypeRepository, WorkItemTypeRepository};
