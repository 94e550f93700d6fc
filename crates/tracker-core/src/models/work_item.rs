//! Work item model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{SpaceId, WorkItemTypeId};
use crate::error::Error;

/// A unique identifier for a work item, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkItemId(Uuid);

impl WorkItemId {
    /// Create a new unique work item ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for WorkItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle state of a work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkItemState {
    #[default]
    New,
    Open,
    #[serde(rename = "in progress")]
    InProgress,
    Resolved,
    Closed,
}

impl WorkItemState {
    /// Stored representation of this state
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Open => "open",
            Self::InProgress => "in progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for WorkItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for WorkItemState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "open" => Ok(Self::Open),
            "in progress" | "in-progress" | "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            other => Err(Error::InvalidInput(format!("Unknown work item state: {other}"))),
        }
    }
}

/// A typed, full-text searchable work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier
    pub id: WorkItemId,
    /// Containing space
    pub space_id: SpaceId,
    /// Declared type; always resolves to an existing type
    pub type_id: WorkItemTypeId,
    /// Title, indexed for full-text search
    pub title: String,
    /// Description, indexed for full-text search
    pub description: String,
    /// Lifecycle state
    pub state: WorkItemState,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
    /// Soft delete flag
    pub is_deleted: bool,
}

impl WorkItem {
    /// Create a new work item of the given type
    #[must_use]
    pub fn new(
        space_id: SpaceId,
        type_id: WorkItemTypeId,
        title: impl Into<String>,
        description: impl Into<String>,
        state: WorkItemState,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: WorkItemId::new(),
            space_id,
            type_id,
            title: title.into(),
            description: description.into(),
            state,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    /// Get the title truncated to `max_len` characters
    #[must_use]
    pub fn title_preview(&self, max_len: usize) -> String {
        self.title.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_id_unique() {
        let id1 = WorkItemId::new();
        let id2 = WorkItemId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_work_item_id_parse() {
        let id = WorkItemId::new();
        let parsed: WorkItemId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_work_item_new() {
        let item = WorkItem::new(
            SpaceId::SYSTEM,
            WorkItemTypeId::new(),
            "Fix login",
            "",
            WorkItemState::Open,
        );
        assert_eq!(item.title, "Fix login");
        assert!(!item.is_deleted);
        assert!(item.created_at > 0);
        assert_eq!(item.created_at, item.updated_at);
    }

    #[test]
    fn test_state_round_trips_through_storage_form() {
        for state in [
            WorkItemState::New,
            WorkItemState::Open,
            WorkItemState::InProgress,
            WorkItemState::Resolved,
            WorkItemState::Closed,
        ] {
            assert_eq!(state.as_str().parse::<WorkItemState>().unwrap(), state);
        }
    }

    #[test]
    fn test_state_parse_is_lenient_about_case_and_separators() {
        assert_eq!(
            "In-Progress".parse::<WorkItemState>().unwrap(),
            WorkItemState::InProgress
        );
        assert!("done".parse::<WorkItemState>().is_err());
    }

    #[test]
    fn test_title_preview() {
        let item = WorkItem::new(
            SpaceId::SYSTEM,
            WorkItemTypeId::new(),
            "A rather long title",
            "",
            WorkItemState::New,
        );
        assert_eq!(item.title_preview(8), "A rather");
    }
}
