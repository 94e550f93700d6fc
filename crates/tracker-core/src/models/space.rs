//! Space model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of the collection a work item or type lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpaceId(Uuid);

impl SpaceId {
    /// The built-in space that owns the seeded system types
    pub const SYSTEM: Self = Self(Uuid::from_u128(0x2e0698d8_753e_4cef_bb7c_f027634824a2));

    /// Create a new unique space ID
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

impl Default for SpaceId {
    fn default() -> Self {
        Self::SYSTEM
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SpaceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_system_space() {
        assert_eq!(SpaceId::default(), SpaceId::SYSTEM);
    }

    #[test]
    fn test_space_id_parse() {
        let id = SpaceId::new();
        let parsed: SpaceId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
