use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use serde::Serialize;
use tracker_core::db::Database;
use tracker_core::{WorkItem, WorkItemType};

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct WorkItemListItem {
    pub id: String,
    pub type_id: String,
    pub title: String,
    pub description: String,
    pub state: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub relative_time: String,
}

#[derive(Debug, Serialize)]
pub struct WorkItemTypeListItem {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub icon: String,
}

pub fn open_database(path: &Path) -> Result<Database, CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::debug!(path = %path.display(), "Opening database");
    Ok(Database::open(path)?)
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("TRACKER_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tracker")
        .join("tracker.db")
}

/// Parse a trimmed, non-empty identifier
pub fn parse_id<T: FromStr>(raw: &str) -> Result<T, CliError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyId);
    }
    trimmed
        .parse()
        .map_err(|_| CliError::InvalidId(trimmed.to_string()))
}

pub fn normalize_title(parts: &[String]) -> Result<String, CliError> {
    let joined = parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn format_item_lines(items: &[WorkItem]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    items
        .iter()
        .map(|item| {
            let id = item.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let title = item_title_preview(item, 40);
            let relative_time = format_relative_time(item.updated_at, now_ms);
            format!(
                "{short_id:<13}  {title:<40}  {:<11}  {relative_time}",
                item.state
            )
        })
        .collect()
}

pub fn format_type_lines(types: &[WorkItemType]) -> Vec<String> {
    types
        .iter()
        .map(|wit| {
            let parent = wit
                .parent_id
                .map_or_else(|| "-".to_string(), |parent| parent.to_string());
            format!("{}  {:<20}  parent={parent}", wit.id, wit.name)
        })
        .collect()
}

pub fn item_to_list_item(item: &WorkItem) -> WorkItemListItem {
    let now_ms = Utc::now().timestamp_millis();
    WorkItemListItem {
        id: item.id.to_string(),
        type_id: item.type_id.to_string(),
        title: item.title.clone(),
        description: item.description.clone(),
        state: item.state.to_string(),
        created_at: item.created_at,
        updated_at: item.updated_at,
        relative_time: format_relative_time(item.updated_at, now_ms),
    }
}

pub fn type_to_list_item(wit: &WorkItemType) -> WorkItemTypeListItem {
    WorkItemTypeListItem {
        id: wit.id.to_string(),
        parent_id: wit.parent_id.map(|parent| parent.to_string()),
        name: wit.name.clone(),
        icon: wit.icon.clone(),
    }
}

pub fn item_title_preview(item: &WorkItem, max_chars: usize) -> String {
    let title = item.title.trim();
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let mut preview = item.title_preview(max_chars.saturating_sub(3));
    preview.push_str("...");
    preview
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else {
        format!("{}w ago", diff / week)
    }
}
