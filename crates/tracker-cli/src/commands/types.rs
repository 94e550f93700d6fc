use std::path::Path;

use tracker_core::db::{SqliteWorkItemTypeRepository, WorkItemTypeRepository};
use tracker_core::{SpaceId, WorkItemType, WorkItemTypeId};

use crate::commands::common::{format_type_lines, open_database, parse_id, type_to_list_item};
use crate::error::CliError;

pub fn run_type_add(
    name: &str,
    parent: Option<&str>,
    icon: &str,
    db_path: &Path,
) -> Result<(), CliError> {
    let wit = add_type(name, parent, icon, db_path)?;
    println!("{}", wit.id);
    Ok(())
}

pub fn add_type(
    name: &str,
    parent: Option<&str>,
    icon: &str,
    db_path: &Path,
) -> Result<WorkItemType, CliError> {
    let parent_id = parent.map(parse_id::<WorkItemTypeId>).transpose()?;
    let db = open_database(db_path)?;
    Ok(db.with_conn(|conn| {
        SqliteWorkItemTypeRepository::new(conn).create(
            SpaceId::SYSTEM,
            name,
            parent_id.as_ref(),
            icon,
        )
    })?)
}

pub fn run_type_list(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let types = db.with_conn(|conn| SqliteWorkItemTypeRepository::new(conn).list())?;

    if as_json {
        let items = types.iter().map(type_to_list_item).collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_type_lines(&types) {
            println!("{line}");
        }
    }

    Ok(())
}
