//! Work item type catalog

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::models::{SpaceId, WorkItemType, WorkItemTypeId};
use crate::search::TypeForest;

/// Trait for type catalog operations
pub trait WorkItemTypeRepository {
    /// Create a new type, optionally extending an existing one
    fn create(
        &self,
        space_id: SpaceId,
        name: &str,
        parent_id: Option<&WorkItemTypeId>,
        icon: &str,
    ) -> Result<WorkItemType>;

    /// Get a type by ID
    fn get(&self, id: &WorkItemTypeId) -> Result<Option<WorkItemType>>;

    /// List every type, roots first
    fn list(&self) -> Result<Vec<WorkItemType>>;

    /// Direct children of a type
    fn children(&self, id: &WorkItemTypeId) -> Result<Vec<WorkItemTypeId>>;

    /// Check whether a type exists
    fn exists(&self, id: &WorkItemTypeId) -> Result<bool>;

    /// Snapshot the whole catalog for hierarchy resolution
    fn load_forest(&self) -> Result<TypeForest>;
}

/// `SQLite` implementation of `WorkItemTypeRepository`
pub struct SqliteWorkItemTypeRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteWorkItemTypeRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a type from a database row
    fn parse_type(row: &rusqlite::Row<'_>) -> rusqlite::Result<WorkItemType> {
        let id: String = row.get(0)?;
        let space_id: String = row.get(1)?;
        let parent_id: Option<String> = row.get(2)?;
        Ok(WorkItemType {
            id: parse_column(0, &id)?,
            space_id: parse_column(1, &space_id)?,
            parent_id: parent_id
                .as_deref()
                .map(|parent| parse_column(2, parent))
                .transpose()?,
            name: row.get(3)?,
            icon: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

/// Parse a UUID-backed column, reporting failures as a conversion error
pub(crate) fn parse_column<T>(index: usize, raw: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = uuid::Error>,
{
    raw.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}

impl WorkItemTypeRepository for SqliteWorkItemTypeRepository<'_> {
    fn create(
        &self,
        space_id: SpaceId,
        name: &str,
        parent_id: Option<&WorkItemTypeId>,
        icon: &str,
    ) -> Result<WorkItemType> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("Type name cannot be empty".into()));
        }

        if let Some(parent) = parent_id {
            if !self.exists(parent)? {
                return Err(Error::NotFound(format!("work item type {parent}")));
            }
        }

        let wit = WorkItemType::new(space_id, name, parent_id.copied(), icon);

        self.conn.execute(
            "INSERT INTO work_item_types (id, space_id, parent_id, name, icon, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                wit.id.as_str(),
                wit.space_id.as_str(),
                wit.parent_id.map(|parent| parent.as_str()),
                wit.name,
                wit.icon,
                wit.created_at
            ],
        )?;

        tracing::debug!(id = %wit.id, parent = ?wit.parent_id, "Created work item type");
        Ok(wit)
    }

    fn get(&self, id: &WorkItemTypeId) -> Result<Option<WorkItemType>> {
        let wit = self
            .conn
            .query_row(
                "SELECT id, space_id, parent_id, name, icon, created_at
                 FROM work_item_types WHERE id = ?",
                params![id.as_str()],
                Self::parse_type,
            )
            .optional()?;
        Ok(wit)
    }

    fn list(&self) -> Result<Vec<WorkItemType>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, space_id, parent_id, name, icon, created_at
             FROM work_item_types
             ORDER BY parent_id IS NOT NULL, created_at ASC, id ASC",
        )?;

        let types = stmt
            .query_map([], Self::parse_type)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(types)
    }

    fn children(&self, id: &WorkItemTypeId) -> Result<Vec<WorkItemTypeId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM work_item_types WHERE parent_id = ? ORDER BY id")?;

        let ids = stmt
            .query_map(params![id.as_str()], |row| {
                let raw: String = row.get(0)?;
                parse_column(0, &raw)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ids)
    }

    fn exists(&self, id: &WorkItemTypeId) -> Result<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM work_item_types WHERE id = ?)",
            params![id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn load_forest(&self) -> Result<TypeForest> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, parent_id FROM work_item_types")?;

        let edges = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let parent: Option<String> = row.get(1)?;
                Ok((
                    parse_column::<WorkItemTypeId>(0, &id)?,
                    parent
                        .as_deref()
                        .map(|raw| parse_column::<WorkItemTypeId>(1, raw))
                        .transpose()?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(TypeForest::from_edges(edges))
    }
}
