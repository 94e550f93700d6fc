use std::path::Path;

use tracker_core::db::{SqliteWorkItemRepository, WorkItemRepository};
use tracker_core::{SpaceId, WorkItem, WorkItemId, WorkItemState, WorkItemTypeId};

use crate::commands::common::{
    format_item_lines, item_to_list_item, normalize_title, open_database, parse_id,
};
use crate::error::CliError;

pub fn run_item_add(
    type_id: &str,
    title_parts: &[String],
    description: &str,
    state: &str,
    db_path: &Path,
) -> Result<(), CliError> {
    let item = add_item(type_id, title_parts, description, state, db_path)?;
    println!("{}", item.id);
    Ok(())
}

pub fn add_item(
    type_id: &str,
    title_parts: &[String],
    description: &str,
    state: &str,
    db_path: &Path,
) -> Result<WorkItem, CliError> {
    let type_id = parse_id::<WorkItemTypeId>(type_id)?;
    let title = normalize_title(title_parts)?;
    let state = state.parse::<WorkItemState>()?;

    let db = open_database(db_path)?;
    Ok(db.with_conn(|conn| {
        SqliteWorkItemRepository::new(conn).create(
            SpaceId::SYSTEM,
            &type_id,
            &title,
            description.trim(),
            state,
        )
    })?)
}

pub fn run_item_list(
    limit: usize,
    offset: usize,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let items = db.with_conn(|conn| SqliteWorkItemRepository::new(conn).list(limit, offset))?;

    if as_json {
        let json_items = items.iter().map(item_to_list_item).collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_item_lines(&items) {
            println!("{line}");
        }
    }

    Ok(())
}

pub fn run_item_delete(id: &str, db_path: &Path) -> Result<(), CliError> {
    let id = parse_id::<WorkItemId>(id)?;
    let db = open_database(db_path)?;
    db.with_conn(|conn| SqliteWorkItemRepository::new(conn).delete(&id))?;
    println!("{id}");
    Ok(())
}
