pub mod common;
pub mod completions;
pub mod item;
pub mod search;
pub mod types;
