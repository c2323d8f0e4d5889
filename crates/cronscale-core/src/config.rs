//! cronscale.toml configuration parser.
//!
//! The file mirrors what a host hands the strategy: a plugin-level
//! `[strategy]` map and one string map per scaling check.
//!
//! ```toml
//! [strategy]
//! separator = "->"
//!
//! [checks.web]
//! count = "2"
//! hysteresis = "2,4,6"
//! period_business = "* * 9-17 * * mon-fri * -> 5"
//! expression_busy = "MetricsMax > 5 ? 7 : 5"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ScalingCheck, TimestampedMetrics};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid metrics file {path}: {source}")]
    Metrics {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown check: {0}")]
    UnknownCheck(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CronScaleConfig {
    /// Plugin-level options (e.g. `separator`).
    #[serde(default)]
    pub strategy: HashMap<String, String>,
    /// Per-check strategy maps, keyed by check name.
    #[serde(default)]
    pub checks: BTreeMap<String, HashMap<String, String>>,
}

impl CronScaleConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the `ScalingCheck` for the named check.
    pub fn check(&self, name: &str) -> Result<ScalingCheck, ConfigError> {
        let config = self
            .checks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownCheck(name.to_string()))?;
        Ok(ScalingCheck {
            name: name.to_string(),
            config: config.clone(),
        })
    }
}

/// Read a JSON array of `{"timestamp", "value"}` samples.
pub fn read_metrics(path: &Path) -> Result<TimestampedMetrics, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut metrics: TimestampedMetrics =
        serde_json::from_str(&content).map_err(|source| ConfigError::Metrics {
            path: path.to_path_buf(),
            source,
        })?;
    metrics.sort_by_key(|m| m.timestamp);
    Ok(metrics)
}
