//! Work item type model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::SpaceId;

/// A unique identifier for a work item type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkItemTypeId(Uuid);

impl WorkItemTypeId {
    /// Create a new unique type ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Build an ID from a fixed 128-bit value
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for WorkItemTypeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkItemTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkItemTypeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Root of the seeded system type forest
pub const SYSTEM_PLANNER_ITEM: WorkItemTypeId =
    WorkItemTypeId::from_u128(0x86af5178_9b41_469b_9096_57e5155c3f31);
pub const SYSTEM_USER_STORY: WorkItemTypeId =
    WorkItemTypeId::from_u128(0xbbf35418_04b6_426c_a60b_7f80beb0b624);
pub const SYSTEM_VALUE_PROPOSITION: WorkItemTypeId =
    WorkItemTypeId::from_u128(0x3194ab60_855b_4155_9005_9dce4a05f1eb);
pub const SYSTEM_FUNDAMENTAL: WorkItemTypeId =
    WorkItemTypeId::from_u128(0xee7ca005_f81d_4eea_9b9b_1965df0988d0);
pub const SYSTEM_EXPERIENCE: WorkItemTypeId =
    WorkItemTypeId::from_u128(0xb9a71831_c803_4f66_8774_4193fffd1311);
pub const SYSTEM_FEATURE: WorkItemTypeId =
    WorkItemTypeId::from_u128(0x0a24d3c2_e0a6_4686_8051_ec0ea1915a28);
pub const SYSTEM_BUG: WorkItemTypeId =
    WorkItemTypeId::from_u128(0x26787039_b68f_4e28_8814_c2f93be1ef4e);
pub const SYSTEM_SCENARIO: WorkItemTypeId =
    WorkItemTypeId::from_u128(0x71171e90_6d35_498f_a6a7_2083b5267c18);
pub const SYSTEM_PAPERCUTS: WorkItemTypeId =
    WorkItemTypeId::from_u128(0x6d603ab4_7c5e_4c5f_bba8_a3ba9d370985);

/// Seeded system types as `(id, name, icon)`, all direct children of
/// [`SYSTEM_PLANNER_ITEM`]
pub const SYSTEM_SUBTYPES: [(WorkItemTypeId, &str, &str); 8] = [
    (SYSTEM_USER_STORY, "User Story", "fa-bookmark"),
    (SYSTEM_VALUE_PROPOSITION, "Value Proposition", "fa-diamond"),
    (SYSTEM_FUNDAMENTAL, "Fundamental", "fa-bank"),
    (SYSTEM_EXPERIENCE, "Experience", "fa-map"),
    (SYSTEM_FEATURE, "Feature", "fa-mouse-pointer"),
    (SYSTEM_BUG, "Bug", "fa-bug"),
    (SYSTEM_SCENARIO, "Scenario", "fa-bolt"),
    (SYSTEM_PAPERCUTS, "Papercuts", "fa-scissors"),
];

/// A node in the work item type forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemType {
    /// Unique identifier
    pub id: WorkItemTypeId,
    /// Owning space
    pub space_id: SpaceId,
    /// Parent type, `None` for a root type
    pub parent_id: Option<WorkItemTypeId>,
    /// Display name
    pub name: String,
    /// Icon name shown by clients
    pub icon: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

impl WorkItemType {
    /// Create a new type with the given name and optional parent
    #[must_use]
    pub fn new(
        space_id: SpaceId,
        name: impl Into<String>,
        parent_id: Option<WorkItemTypeId>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: WorkItemTypeId::new(),
            space_id,
            parent_id,
            name: name.into(),
            icon: icon.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Check whether this type is a root of the forest
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_parse() {
        let id = WorkItemTypeId::new();
        let parsed: WorkItemTypeId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_type_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<WorkItemTypeId>().is_err());
    }

    #[test]
    fn test_new_type_root_and_child() {
        let base = WorkItemType::new(SpaceId::SYSTEM, "base", None, "fa-bomb");
        let child = WorkItemType::new(SpaceId::SYSTEM, "child", Some(base.id), "fa-bomb");
        assert!(base.is_root());
        assert!(!child.is_root());
        assert_eq!(child.parent_id, Some(base.id));
    }

    #[test]
    fn test_system_subtype_ids_are_distinct() {
        let mut ids: Vec<_> = SYSTEM_SUBTYPES.iter().map(|(id, _, _)| *id).collect();
        ids.push(SYSTEM_PLANNER_ITEM);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), SYSTEM_SUBTYPES.len() + 1);
    }
}
