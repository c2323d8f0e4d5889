//! Hysteresis band — damps scale-down around threshold crossings.
//!
//! `2,4,6` means: once the count reaches 4 it cannot drop unless the new
//! value is 2 or lower, and once it reaches 6 it cannot drop unless the new
//! value is 4 or lower. An exact hit on a threshold counts as being in the
//! bracket above it, so from exactly 6 the lower edge is 6 itself and any
//! scale-down passes.

use cronscale_core::ExpressionTable;

use crate::error::{StrategyError, StrategyResult};

/// Non-decreasing list of at least two thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HysteresisBand {
    thresholds: Vec<i64>,
}

impl HysteresisBand {
    /// Parse a comma-separated band of literals and expression names.
    pub fn parse(value: &str, expressions: &ExpressionTable) -> StrategyResult<Self> {
        let invalid = |reason: &'static str| StrategyError::InvalidHysteresis {
            value: value.to_string(),
            reason,
        };

        let thresholds = value
            .split(',')
            .map(|part| expressions.resolve(part))
            .collect::<Option<Vec<i64>>>()
            .ok_or_else(|| invalid("not an integer or known expression"))?;

        Self::new(thresholds).map_err(|e| match e {
            StrategyError::InvalidHysteresis { reason, .. } => invalid(reason),
            other => other,
        })
    }

    pub fn new(thresholds: Vec<i64>) -> StrategyResult<Self> {
        let value = thresholds
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        if thresholds.len() < 2 {
            return Err(StrategyError::InvalidHysteresis {
                value,
                reason: "needs at least two thresholds",
            });
        }
        if !thresholds.is_sorted() {
            return Err(StrategyError::InvalidHysteresis {
                value,
                reason: "thresholds must be ascending",
            });
        }
        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &[i64] {
        &self.thresholds
    }

    /// The count to use given the current count and the proposed target.
    ///
    /// Only a scale-down (`proposed < current`) can be suppressed, in which
    /// case `current` is returned.
    pub fn apply(&self, current: i64, proposed: i64) -> i64 {
        if proposed >= current {
            return proposed;
        }

        // Bracket of the current count: first threshold >= current, moved
        // one up on an exact hit.
        let mut idx = self.thresholds.partition_point(|t| *t < current);
        if self.thresholds.get(idx) == Some(&current) {
            idx += 1;
        }
        if idx == 0 {
            return proposed;
        }

        let lower = self.thresholds[idx - 1];
        if proposed > lower { current } else { proposed }
    }
}
