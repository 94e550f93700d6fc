//! Search execution against the `SQLite` record store

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode};
use serde::Serialize;

use super::hierarchy::TypeClosure;
use crate::db::{parse_work_item, WORK_ITEM_COLUMNS};
use crate::error::{Error, Result};
use crate::models::WorkItem;

/// Virtual machine steps between cancellation checks
const ABORT_CHECK_INTERVAL: i32 = 1_000;

/// A window into the ordered match set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
}

/// One page of matches plus the exact size of the whole match set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub items: Vec<WorkItem>,
    pub total_count: u64,
}

/// Build the FTS5 expression for a list of terms
///
/// Each term becomes a quoted prefix phrase and phrases are ANDed. Control
/// characters are stripped first; FTS5 rejects a NUL inside a string. Terms
/// without any letter or digit carry no tokens and are skipped. Returns
/// `None` when nothing is left, meaning "match every record".
pub fn match_expression(terms: &[String]) -> Option<String> {
    let phrases: Vec<String> = terms
        .iter()
        .map(|term| term.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|term| term.chars().any(char::is_alphanumeric))
        .map(|term| format!("\"{}\"*", term.replace('"', "\"\"")))
        .collect();

    if phrases.is_empty() {
        None
    } else {
        Some(phrases.join(" "))
    }
}

/// A compiled predicate: `FROM ... WHERE ...` plus its bound values
struct Predicate {
    from_where: String,
    values: Vec<Value>,
}

impl Predicate {
    fn build(terms: &[String], closure: &TypeClosure) -> Result<Self> {
        let mut from = String::from("FROM work_items w");
        let mut conditions = vec!["w.is_deleted = 0".to_string()];
        let mut values = Vec::new();

        if let Some(expression) = match_expression(terms) {
            from.push_str(" JOIN work_items_fts ON work_items_fts.rowid = w.rowid");
            conditions.push("work_items_fts MATCH ?".to_string());
            values.push(Value::Text(expression));
        }

        if let Some(ids) = closure.members() {
            let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
            conditions.push("w.type_id IN (SELECT value FROM json_each(?))".to_string());
            values.push(Value::Text(serde_json::to_string(&ids)?));
        }

        Ok(Self {
            from_where: format!("{from} WHERE {}", conditions.join(" AND ")),
            values,
        })
    }
}

/// Run a search and count its matches
///
/// Callers should hold a read transaction so the count and the page observe
/// the same snapshot.
pub fn execute(
    conn: &Connection,
    terms: &[String],
    closure: &TypeClosure,
    pagination: Pagination,
) -> Result<SearchResult> {
    if closure.members().is_some_and(std::collections::BTreeSet::is_empty) {
        return Ok(SearchResult::default());
    }

    let predicate = Predicate::build(terms, closure)?;

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) {}", predicate.from_where),
        params_from_iter(predicate.values.iter()),
        |row| row.get(0),
    )?;
    let total_count = u64::try_from(total).unwrap_or_default();

    if pagination.limit == 0 || pagination.offset as u64 >= total_count {
        return Ok(SearchResult {
            items: Vec::new(),
            total_count,
        });
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {WORK_ITEM_COLUMNS} {} ORDER BY w.created_at ASC, w.id ASC LIMIT ? OFFSET ?",
        predicate.from_where
    ))?;

    let page_values = predicate.values.iter().cloned().chain([
        Value::Integer(pagination.limit as i64),
        Value::Integer(pagination.offset as i64),
    ]);

    let items = stmt
        .query_map(params_from_iter(page_values), parse_work_item)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(SearchResult { items, total_count })
}

/// Map low-level storage failures onto the search error taxonomy
pub fn classify_error(error: Error) -> Error {
    let Error::Sqlite(inner) = error else {
        return error;
    };

    let code = match &inner {
        rusqlite::Error::SqliteFailure(failure, _) => failure.code,
        _ => return Error::Sqlite(inner),
    };

    match code {
        ErrorCode::OperationInterrupted => Error::Cancelled,
        ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::CannotOpen
        | ErrorCode::SystemIoFailure
        | ErrorCode::DatabaseCorrupt
        | ErrorCode::NotADatabase
        | ErrorCode::DiskFull
        | ErrorCode::OutOfMemory => Error::StorageUnavailable(inner.to_string()),
        _ => Error::Sqlite(inner),
    }
}

/// Aborts statements on a connection once its flag is raised
///
/// The handler is removed again on drop so it never outlives one search.
pub struct AbortHook<'a> {
    conn: &'a Connection,
}

impl<'a> AbortHook<'a> {
    pub fn install(conn: &'a Connection, flag: Arc<AtomicBool>) -> Self {
        conn.progress_handler(
            ABORT_CHECK_INTERVAL,
            Some(move || flag.load(Ordering::Relaxed)),
        );
        Self { conn }
    }
}

impl Drop for AbortHook<'_> {
    fn drop(&mut self) {
        self.conn.progress_handler(0, None::<fn() -> bool>);
    }
}
