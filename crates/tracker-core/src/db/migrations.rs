//! Database migrations

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::models::{SpaceId, SYSTEM_PLANNER_ITEM, SYSTEM_SUBTYPES};

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Migration to version 1: type catalog, work items, full-text index
fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );
        CREATE TABLE IF NOT EXISTS work_item_types (
            id TEXT PRIMARY KEY,
            space_id TEXT NOT NULL,
            parent_id TEXT REFERENCES work_item_types(id),
            name TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_work_item_types_parent ON work_item_types(parent_id);
        CREATE TABLE IF NOT EXISTS work_items (
            id TEXT PRIMARY KEY,
            space_id TEXT NOT NULL,
            type_id TEXT NOT NULL REFERENCES work_item_types(id),
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            state TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_work_items_type ON work_items(type_id);
        CREATE INDEX IF NOT EXISTS idx_work_items_created ON work_items(created_at, id);
        CREATE INDEX IF NOT EXISTS idx_work_items_deleted ON work_items(is_deleted);
        CREATE VIRTUAL TABLE IF NOT EXISTS work_items_fts USING fts5(
            title,
            description,
            content=work_items,
            content_rowid=rowid
        );
        CREATE TRIGGER IF NOT EXISTS work_items_ai AFTER INSERT ON work_items BEGIN
            INSERT INTO work_items_fts(rowid, title, description)
            VALUES (NEW.rowid, NEW.title, NEW.description);
        END;
        CREATE TRIGGER IF NOT EXISTS work_items_ad AFTER DELETE ON work_items BEGIN
            INSERT INTO work_items_fts(work_items_fts, rowid, title, description)
            VALUES ('delete', OLD.rowid, OLD.title, OLD.description);
        END;
        CREATE TRIGGER IF NOT EXISTS work_items_au AFTER UPDATE ON work_items BEGIN
            INSERT INTO work_items_fts(work_items_fts, rowid, title, description)
            VALUES ('delete', OLD.rowid, OLD.title, OLD.description);
            INSERT INTO work_items_fts(rowid, title, description)
            VALUES (NEW.rowid, NEW.title, NEW.description);
        END;
        INSERT INTO schema_version (version) VALUES (1);
        COMMIT;",
    )
    .inspect_err(|_| {
        conn.execute_batch("ROLLBACK").ok();
    })?;

    tracing::info!("Migrated database to version 1");
    Ok(())
}

/// Migration to version 2: seed the system type forest
fn migrate_v2(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let now = chrono::Utc::now().timestamp_millis();
    let system_space = SpaceId::SYSTEM.as_str();

    tx.execute(
        "INSERT OR IGNORE INTO work_item_types (id, space_id, parent_id, name, icon, created_at)
         VALUES (?, ?, NULL, ?, ?, ?)",
        params![
            SYSTEM_PLANNER_ITEM.as_str(),
            system_space,
            "Planner Item",
            "fa-paint-brush",
            now
        ],
    )?;

    for (id, name, icon) in SYSTEM_SUBTYPES {
        tx.execute(
            "INSERT OR IGNORE INTO work_item_types (id, space_id, parent_id, name, icon, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                id.as_str(),
                system_space,
                SYSTEM_PLANNER_ITEM.as_str(),
                name,
                icon,
                now
            ],
        )?;
    }

    tx.execute("INSERT INTO schema_version (version) VALUES (2)", [])?;
    tx.commit()?;

    tracing::info!("Migrated database to version {CURRENT_VERSION}");
    Ok(())
}
