//! Data models for Tracker

mod space;
mod work_item;
mod work_item_type;

pub use space::SpaceId;
pub use work_item::{WorkItem, WorkItemId, WorkItemState};
pub use work_item_type::{
    WorkItemType, WorkItemTypeId, SYSTEM_BUG, SYSTEM_EXPERIENCE, SYSTEM_FEATURE,
    SYSTEM_FUNDAMENTAL, SYSTEM_PAPERCUTS, SYSTEM_PLANNER_ITEM, SYSTEM_SCENARIO, SYSTEM_SUBTYPES,
    SYSTEM_USER_STORY, SYSTEM_VALUE_PROPOSITION,
};
