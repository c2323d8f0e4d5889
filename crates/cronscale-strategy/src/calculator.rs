//! Target count calculation.
//!
//! ```text
//! expressions ──► ExpressionTable
//!                     │
//! count ──────────────┼──► default
//! hysteresis ─────────┼──► HysteresisBand
//! period_* ───────────┴──► Rules ──► active at now ──► resolve() ──► winner
//!
//! target = hysteresis.apply(current, winner.count or default)
//! ```

use chrono::NaiveDateTime;
use tracing::{debug, trace, warn};

use cronscale_core::{ExpressionTable, TimestampedMetric};
use cronscale_expr::{Bindings, Evaluator};
use cronscale_schedule::{Rule, parse_rule, resolve};

use crate::config::{CheckConfig, KEY_COUNT};
use crate::error::{StrategyError, StrategyResult};
use crate::hysteresis::HysteresisBand;

/// Count used when a check sets no `count` and no period matches.
pub const FALLBACK_COUNT: i64 = 1;

/// Computes the target count for one evaluation of a check.
pub struct TargetCalculator<'a> {
    pub separator: &'a str,
    pub evaluator: &'a dyn Evaluator,
}

impl TargetCalculator<'_> {
    /// Evaluate every expression, skipping the ones that fail.
    pub fn expression_table(
        &self,
        config: &CheckConfig,
        count: i64,
        metrics: &[TimestampedMetric],
    ) -> ExpressionTable {
        let bindings = Bindings::new(count, metrics);
        let mut table = ExpressionTable::new();
        for expr in &config.expressions {
            match self.evaluator.evaluate(&expr.formula, &bindings) {
                Ok(value) => table.insert(expr.name.clone(), value),
                Err(e) => {
                    warn!(
                        expression = %expr.name,
                        formula = %expr.formula,
                        error = %e,
                        "could not evaluate expression"
                    );
                }
            }
        }
        table
    }

    pub fn target_count(
        &self,
        config: &CheckConfig,
        count: i64,
        metrics: &[TimestampedMetric],
        now: NaiveDateTime,
    ) -> StrategyResult<i64> {
        let expressions = self.expression_table(config, count, metrics);

        let default = match &config.count {
            Some(value) => expressions
                .resolve(value)
                .ok_or_else(|| StrategyError::InvalidValue {
                    key: KEY_COUNT,
                    value: value.clone(),
                })?,
            None => FALLBACK_COUNT,
        };

        let band = config
            .hysteresis
            .as_deref()
            .map(|value| HysteresisBand::parse(value, &expressions))
            .transpose()?;

        let mut active: Vec<Rule> = Vec::new();
        for period in &config.periods {
            let rule = parse_rule(&period.key, &period.value, self.separator, &expressions)?;
            let in_period = rule.is_active(&now);
            trace!(
                period = %rule.period(),
                key = %rule.key,
                in_period,
                priority = %rule.priority,
                "checking period"
            );
            if in_period {
                active.push(rule);
            }
        }

        let proposed = match resolve(active) {
            Some(rule) => {
                trace!(
                    period = %rule.period(),
                    key = %rule.key,
                    priority = %rule.priority,
                    count = rule.count,
                    "selected period"
                );
                rule.count
            }
            None => default,
        };

        let target = match &band {
            Some(band) => {
                let target = band.apply(count, proposed);
                if target != proposed {
                    debug!(
                        current = count,
                        proposed,
                        thresholds = ?band.thresholds(),
                        "hysteresis suppressed scale-down"
                    );
                }
                target
            }
            None => proposed,
        };

        Ok(target)
    }
}
