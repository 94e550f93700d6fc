//! Search configuration
//!
//! Pagination defaults and limits, read from the environment with fallbacks.

use std::collections::HashMap;
use std::env;

use thiserror::Error;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;
const MAX_LIMIT_CEILING: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for crate::Error {
    fn from(error: ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

/// Pagination policy applied by the search facade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Page size used when the caller gives none
    pub default_limit: usize,
    /// Upper bound on any requested page size
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_limit = parse_usize(&lookup, "TRACKER_SEARCH_MAX_LIMIT", MAX_LIMIT)?;
        if !(1..=MAX_LIMIT_CEILING).contains(&max_limit) {
            return Err(ConfigError::Invalid(format!(
                "TRACKER_SEARCH_MAX_LIMIT must be in [1, {MAX_LIMIT_CEILING}]"
            )));
        }

        let default_limit = parse_usize(
            &lookup,
            "TRACKER_SEARCH_DEFAULT_LIMIT",
            DEFAULT_LIMIT.min(max_limit),
        )?;
        if !(1..=max_limit).contains(&default_limit) {
            return Err(ConfigError::Invalid(format!(
                "TRACKER_SEARCH_DEFAULT_LIMIT must be in [1, {max_limit}]"
            )));
        }

        Ok(Self {
            default_limit,
            max_limit,
        })
    }

    /// Effective page size for an optional requested limit
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

fn parse_usize(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: usize,
) -> Result<usize, ConfigError> {
    optional_trimmed(lookup, name).map_or(Ok(default), |value| {
        value
            .parse::<usize>()
            .map_err(|_| ConfigError::Invalid(format!("{name} must be a positive integer")))
    })
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(map: &HashMap<&str, &str>) -> Result<SearchConfig, ConfigError> {
        SearchConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = from_map(&HashMap::new()).unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let map = HashMap::from([("TRACKER_SEARCH_MAX_LIMIT", "  ")]);
        assert_eq!(from_map(&map).unwrap().max_limit, MAX_LIMIT);
    }

    #[test]
    fn small_max_limit_lowers_default() {
        let map = HashMap::from([("TRACKER_SEARCH_MAX_LIMIT", "5")]);
        let config = from_map(&map).unwrap();
        assert_eq!(config.max_limit, 5);
        assert_eq!(config.default_limit, 5);
    }

    #[test]
    fn default_above_max_is_rejected() {
        let map = HashMap::from([
            ("TRACKER_SEARCH_MAX_LIMIT", "10"),
            ("TRACKER_SEARCH_DEFAULT_LIMIT", "11"),
        ]);
        let err = from_map(&map).unwrap_err();
        assert!(err.to_string().contains("TRACKER_SEARCH_DEFAULT_LIMIT"));
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let map = HashMap::from([("TRACKER_SEARCH_MAX_LIMIT", "lots")]);
        assert!(from_map(&map).is_err());
    }

    #[test]
    fn clamp_limit_applies_default_and_ceiling() {
        let config = SearchConfig::default();
        assert_eq!(config.clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(config.clamp_limit(Some(5)), 5);
        assert_eq!(config.clamp_limit(Some(5_000)), MAX_LIMIT);
    }
}
