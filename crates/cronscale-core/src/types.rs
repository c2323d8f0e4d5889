//! Shared types used across cronscale crates.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single observed metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestampedMetric {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl TimestampedMetric {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A metric series, ordered by timestamp (oldest first).
pub type TimestampedMetrics = Vec<TimestampedMetric>;

/// Direction of a scaling action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleDirection {
    #[default]
    None,
    Up,
    Down,
}

impl ScaleDirection {
    /// Direction of moving from `current` to `target`.
    pub fn between(current: i64, target: i64) -> Self {
        if current == target {
            ScaleDirection::None
        } else if current < target {
            ScaleDirection::Up
        } else {
            ScaleDirection::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleDirection::None => "none",
            ScaleDirection::Up => "up",
            ScaleDirection::Down => "down",
        }
    }
}

impl fmt::Display for ScaleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The action a strategy recommends for a scaling check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingAction {
    pub direction: ScaleDirection,
    /// New instance count. Only set when `direction` is not `None`.
    pub count: Option<i64>,
    /// Human-readable reason. Only set when `direction` is not `None`.
    pub reason: Option<String>,
}

/// A named scaling check and the strategy configuration attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingCheck {
    pub name: String,
    pub config: HashMap<String, String>,
}

/// Everything a strategy sees for one evaluation of a scaling check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalingEvaluation {
    pub check: ScalingCheck,
    pub metrics: TimestampedMetrics,
    pub action: ScalingAction,
}

impl ScalingEvaluation {
    pub fn new(check: ScalingCheck, metrics: TimestampedMetrics) -> Self {
        Self {
            check,
            metrics,
            action: ScalingAction::default(),
        }
    }
}
