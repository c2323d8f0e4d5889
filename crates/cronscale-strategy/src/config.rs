//! Typed strategy and check configuration.
//!
//! Hosts hand the strategy plain string maps. They are read once into
//! [`StrategyOptions`] (plugin level) and [`CheckConfig`] (per check), with
//! periods and expressions kept in name order so evaluation never depends
//! on map iteration order.

use std::collections::HashMap;

use tracing::{debug, warn};

use cronscale_schedule::DEFAULT_SEPARATOR;

pub const KEY_SEPARATOR: &str = "separator";
pub const KEY_COUNT: &str = "count";
pub const KEY_HYSTERESIS: &str = "hysteresis";
pub const PERIOD_PREFIX: &str = "period_";
pub const EXPRESSION_PREFIX: &str = "expression_";

/// Plugin-level options, fixed for the lifetime of the strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOptions {
    /// Token between a period's window and its reference.
    pub separator: String,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl StrategyOptions {
    pub fn from_map(config: &HashMap<String, String>) -> Self {
        let mut options = Self::default();
        if let Some(sep) = config.get(KEY_SEPARATOR) {
            options.separator = sep.clone();
        }
        options
    }
}

/// A `period_<label>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodEntry {
    /// Full config key, e.g. `period_business`.
    pub key: String,
    pub value: String,
}

/// An `expression_<name>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionEntry {
    pub name: String,
    pub formula: String,
}

/// The strategy configuration of a single scaling check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckConfig {
    pub count: Option<String>,
    pub hysteresis: Option<String>,
    /// Sorted by key.
    pub periods: Vec<PeriodEntry>,
    /// Sorted by name.
    pub expressions: Vec<ExpressionEntry>,
}

impl CheckConfig {
    pub fn from_map(config: &HashMap<String, String>) -> Self {
        let mut check = Self::default();

        for (key, value) in config {
            if key == KEY_COUNT {
                check.count = Some(value.clone());
            } else if key == KEY_HYSTERESIS {
                check.hysteresis = Some(value.clone());
            } else if key.starts_with(PERIOD_PREFIX) {
                check.periods.push(PeriodEntry {
                    key: key.clone(),
                    value: value.clone(),
                });
            } else if let Some(name) = key.strip_prefix(EXPRESSION_PREFIX) {
                if name.is_empty() {
                    warn!(%key, "ignoring expression without a name");
                    continue;
                }
                check.expressions.push(ExpressionEntry {
                    name: name.to_string(),
                    formula: value.clone(),
                });
            } else {
                debug!(%key, "ignoring unrecognized strategy key");
            }
        }

        check.periods.sort_by(|a, b| a.key.cmp(&b.key));
        check.expressions.sort_by(|a, b| a.name.cmp(&b.name));
        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn separator_defaults_to_arrow() {
        assert_eq!(StrategyOptions::from_map(&HashMap::new()).separator, "->");
        assert_eq!(
            StrategyOptions::from_map(&map(&[("separator", "=>")])).separator,
            "=>"
        );
    }

    #[test]
    fn groups_keys_by_prefix() {
        let config = CheckConfig::from_map(&map(&[
            ("count", "2"),
            ("hysteresis", "2,4"),
            ("period_b", "* * * * * * * -> 3"),
            ("period_a", "* * * * * * * -> 4"),
            ("expression_z", "1"),
            ("expression_y", "2"),
            ("expression_", "3"),
            ("target", "ignored"),
        ]));

        assert_eq!(config.count.as_deref(), Some("2"));
        assert_eq!(config.hysteresis.as_deref(), Some("2,4"));
        let keys: Vec<_> = config.periods.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["period_a", "period_b"]);
        let names: Vec<_> = config.expressions.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["y", "z"]);
    }
}
