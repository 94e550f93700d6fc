//! Work item repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use rusqlite::{params, Connection, OptionalExtension};

use super::type_repository::parse_column;
use crate::error::{Error, Result};
use crate::models::{SpaceId, WorkItem, WorkItemId, WorkItemState, WorkItemTypeId};

/// Columns selected by every work item query, in `parse_work_item` order
pub(crate) const WORK_ITEM_COLUMNS: &str =
    "w.id, w.space_id, w.type_id, w.title, w.description, w.state, w.created_at, w.updated_at, w.is_deleted";

/// Trait for work item storage operations
pub trait WorkItemRepository {
    /// Create a new work item of an existing type
    fn create(
        &self,
        space_id: SpaceId,
        type_id: &WorkItemTypeId,
        title: &str,
        description: &str,
        state: WorkItemState,
    ) -> Result<WorkItem>;

    /// Get a visible work item by ID
    fn get(&self, id: &WorkItemId) -> Result<Option<WorkItem>>;

    /// List visible work items in creation order
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<WorkItem>>;

    /// Update a work item's title, description, and state
    fn update(
        &self,
        id: &WorkItemId,
        title: &str,
        description: &str,
        state: WorkItemState,
    ) -> Result<WorkItem>;

    /// Soft delete a work item
    fn delete(&self, id: &WorkItemId) -> Result<()>;

    /// Count visible work items
    fn count(&self) -> Result<u64>;
}

/// `SQLite` implementation of `WorkItemRepository`
pub struct SqliteWorkItemRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteWorkItemRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn require_type(&self, type_id: &WorkItemTypeId) -> Result<()> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM work_item_types WHERE id = ?)",
            params![type_id.as_str()],
            |row| row.get(0),
        )?;
        if exists {
            Ok(())
        } else {
            Err(Error::NotFound(format!("work item type {type_id}")))
        }
    }
}

/// Parse a work item from a row selected with [`WORK_ITEM_COLUMNS`]
pub(crate) fn parse_work_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<WorkItem> {
    let id: String = row.get(0)?;
    let space_id: String = row.get(1)?;
    let type_id: String = row.get(2)?;
    let state: String = row.get(5)?;
    Ok(WorkItem {
        id: parse_column(0, &id)?,
        space_id: parse_column(1, &space_id)?,
        type_id: parse_column(2, &type_id)?,
        title: row.get(3)?,
        description: row.get(4)?,
        state: state.parse().map_err(|error: Error| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
        is_deleted: row.get::<_, i32>(8)? != 0,
    })
}

fn normalize_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("Work item title cannot be empty".into()));
    }
    Ok(title)
}

impl WorkItemRepository for SqliteWorkItemRepository<'_> {
    fn create(
        &self,
        space_id: SpaceId,
        type_id: &WorkItemTypeId,
        title: &str,
        description: &str,
        state: WorkItemState,
    ) -> Result<WorkItem> {
        let title = normalize_title(title)?;
        self.require_type(type_id)?;

        let item = WorkItem::new(space_id, *type_id, title, description, state);

        self.conn.execute(
            "INSERT INTO work_items
                (id, space_id, type_id, title, description, state, created_at, updated_at, is_deleted)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                item.id.as_str(),
                item.space_id.as_str(),
                item.type_id.as_str(),
                item.title,
                item.description,
                item.state.as_str(),
                item.created_at,
                item.updated_at,
                i32::from(item.is_deleted)
            ],
        )?;

        tracing::debug!(id = %item.id, type_id = %item.type_id, "Created work item");
        Ok(item)
    }

    fn get(&self, id: &WorkItemId) -> Result<Option<WorkItem>> {
        let item = self
            .conn
            .query_row(
                &format!(
                    "SELECT {WORK_ITEM_COLUMNS} FROM work_items w WHERE w.id = ? AND w.is_deleted = 0"
                ),
                params![id.as_str()],
                parse_work_item,
            )
            .optional()?;
        Ok(item)
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<WorkItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {WORK_ITEM_COLUMNS}
             FROM work_items w
             WHERE w.is_deleted = 0
             ORDER BY w.created_at ASC, w.id ASC
             LIMIT ? OFFSET ?"
        ))?;

        let items = stmt
            .query_map(params![limit as i64, offset as i64], parse_work_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(items)
    }

    fn update(
        &self,
        id: &WorkItemId,
        title: &str,
        description: &str,
        state: WorkItemState,
    ) -> Result<WorkItem> {
        let title = normalize_title(title)?;
        let now = chrono::Utc::now().timestamp_millis();

        let rows = self.conn.execute(
            "UPDATE work_items SET title = ?, description = ?, state = ?, updated_at = ?
             WHERE id = ? AND is_deleted = 0",
            params![title, description, state.as_str(), now, id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        self.get(id)?.ok_or_else(|| Error::NotFound(id.to_string()))
    }

    fn delete(&self, id: &WorkItemId) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();

        let rows = self.conn.execute(
            "UPDATE work_items SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0",
            params![now, id.as_str()],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }

        tracing::debug!(%id, "Soft deleted work item");
        Ok(())
    }

    fn count(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM work_items WHERE is_deleted = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::SYSTEM_BUG;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup();
        db.with_conn(|conn| {
            let repo = SqliteWorkItemRepository::new(conn);
            let item = repo.create(
                SpaceId::SYSTEM,
                &SYSTEM_BUG,
                "Crash on save",
                "stack trace attached",
                WorkItemState::Open,
            )?;

            let fetched = repo.get(&item.id)?.unwrap();
            assert_eq!(fetched, item);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_create_rejects_unknown_type() {
        let db = setup();
        let result = db.with_conn(|conn| {
            SqliteWorkItemRepository::new(conn).create(
                SpaceId::SYSTEM,
                &WorkItemTypeId::new(),
                "Dangling",
                "",
                WorkItemState::New,
            )
        });
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_in_creation_order() {
        let db = setup();
        db.with_conn(|conn| {
            let repo = SqliteWorkItemRepository::new(conn);
            let first = repo.create(
                SpaceId::SYSTEM,
                &SYSTEM_BUG,
                "one",
                "",
                WorkItemState::New,
            )?;
            let second = repo.create(
                SpaceId::SYSTEM,
                &SYSTEM_BUG,
                "two",
                "",
                WorkItemState::New,
            )?;
            repo.create(
                SpaceId::SYSTEM,
                &SYSTEM_BUG,
                "three",
                "",
                WorkItemState::New,
            )?;

            let page = repo.list(2, 0)?;
            assert_eq!(page.len(), 2);
            assert_eq!(page[0].id, first.id);
            assert_eq!(page[1].id, second.id);
            assert_eq!(repo.list(10, 2)?.len(), 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_update() {
        let db = setup();
        db.with_conn(|conn| {
            let repo = SqliteWorkItemRepository::new(conn);
            let item = repo.create(
                SpaceId::SYSTEM,
                &SYSTEM_BUG,
                "Original",
                "",
                WorkItemState::New,
            )?;
            let updated = repo.update(&item.id, "Updated", "more", WorkItemState::Closed)?;

            assert_eq!(updated.title, "Updated");
            assert_eq!(updated.state, WorkItemState::Closed);
            assert!(updated.updated_at >= item.updated_at);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_delete_hides_item() {
        let db = setup();
        db.with_conn(|conn| {
            let repo = SqliteWorkItemRepository::new(conn);
            let item = repo.create(
                SpaceId::SYSTEM,
                &SYSTEM_BUG,
                "To delete",
                "",
                WorkItemState::New,
            )?;
            repo.delete(&item.id)?;

            assert!(repo.get(&item.id)?.is_none());
            assert!(repo.list(10, 0)?.is_empty());
            assert_eq!(repo.count()?, 0);
            assert!(matches!(repo.delete(&item.id), Err(Error::NotFound(_))));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_corrupt_state_is_a_conversion_error() {
        let db = setup();
        db.with_conn(|conn| {
            let repo = SqliteWorkItemRepository::new(conn);
            let item = repo.create(
                SpaceId::SYSTEM,
                &SYSTEM_BUG,
                "Garbled",
                "",
                WorkItemState::Open,
            )?;
            conn.execute(
                "UPDATE work_items SET state = 'done-ish' WHERE id = ?",
                params![item.id.as_str()],
            )?;

            assert!(matches!(
                repo.get(&item.id),
                Err(Error::Sqlite(rusqlite::Error::FromSqlConversionFailure(5, _, _)))
            ));
            Ok(())
        })
        .unwrap();
    }
}
