//! The cron strategy — schedule-driven scaling decisions.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::trace;

use cronscale_core::{ScaleDirection, ScalingEvaluation, TimestampedMetric};
use cronscale_expr::{Evaluator, FormulaEvaluator};

use crate::calculator::TargetCalculator;
use crate::clock::{Clock, LocalClock};
use crate::config::{CheckConfig, StrategyOptions};
use crate::error::StrategyResult;

/// Name the strategy is registered under.
pub const STRATEGY_NAME: &str = "cron";

/// A scaling strategy.
///
/// `run` fills in `eval.action` given the current count. On error the
/// action is left untouched and the caller keeps the current count.
pub trait Strategy: Send + Sync {
    fn run(&self, eval: &mut ScalingEvaluation, count: i64) -> StrategyResult<()>;
}

/// Picks the count from time-of-day periods, expressions and hysteresis.
///
/// Holds no state between evaluations besides its options, so one instance
/// can serve concurrent checks.
pub struct CronStrategy<C = LocalClock, E = FormulaEvaluator> {
    options: StrategyOptions,
    clock: C,
    evaluator: E,
}

impl CronStrategy {
    pub fn new(options: StrategyOptions) -> Self {
        Self {
            options,
            clock: LocalClock,
            evaluator: FormulaEvaluator,
        }
    }
}

impl Default for CronStrategy {
    fn default() -> Self {
        Self::new(StrategyOptions::default())
    }
}

impl<C, E> CronStrategy<C, E> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> CronStrategy<C2, E> {
        CronStrategy {
            options: self.options,
            clock,
            evaluator: self.evaluator,
        }
    }

    pub fn with_evaluator<E2: Evaluator>(self, evaluator: E2) -> CronStrategy<C, E2> {
        CronStrategy {
            options: self.options,
            clock: self.clock,
            evaluator,
        }
    }

    pub fn options(&self) -> &StrategyOptions {
        &self.options
    }
}

impl<C: Clock, E: Evaluator> CronStrategy<C, E> {
    /// Compute the target count for a check's strategy map at `now`.
    pub fn calculate_target_count(
        &self,
        config: &HashMap<String, String>,
        count: i64,
        metrics: &[TimestampedMetric],
        now: NaiveDateTime,
    ) -> StrategyResult<i64> {
        let calculator = TargetCalculator {
            separator: &self.options.separator,
            evaluator: &self.evaluator,
        };
        calculator.target_count(&CheckConfig::from_map(config), count, metrics, now)
    }
}

impl<C: Clock, E: Evaluator> Strategy for CronStrategy<C, E> {
    fn run(&self, eval: &mut ScalingEvaluation, count: i64) -> StrategyResult<()> {
        let target = self.calculate_target_count(
            &eval.check.config,
            count,
            &eval.metrics,
            self.clock.now(),
        )?;

        let direction = ScaleDirection::between(count, target);
        eval.action.direction = direction;
        if direction == ScaleDirection::None {
            return Ok(());
        }

        trace!(
            check_name = %eval.check.name,
            current_count = count,
            new_count = target,
            %direction,
            "calculated scaling strategy results"
        );

        eval.action.count = Some(target);
        eval.action.reason = Some(format!(
            "scaling {direction} because {STRATEGY_NAME} value is {target}"
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cronscale_core::{ScalingAction, ScalingCheck};
    use cronscale_expr::{Bindings, ExprError, ExprResult};

    use crate::clock::FixedClock;

    fn saturday_10am() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 24)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn weekend_strategy() -> CronStrategy<FixedClock> {
        CronStrategy::new(StrategyOptions::default()).with_clock(FixedClock(saturday_10am()))
    }

    fn evaluation(entries: &[(&str, &str)]) -> ScalingEvaluation {
        ScalingEvaluation::new(
            ScalingCheck {
                name: "web".to_string(),
                config: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
            Vec::new(),
        )
    }

    #[test]
    fn reports_direction_count_and_reason() {
        let strategy = weekend_strategy();
        let mut eval = evaluation(&[("count", "1"), ("period_weekend", "* * * * * sat,sun * -> 4")]);

        strategy.run(&mut eval, 2).unwrap();
        assert_eq!(eval.action.direction, ScaleDirection::Up);
        assert_eq!(eval.action.count, Some(4));
        assert_eq!(
            eval.action.reason.as_deref(),
            Some("scaling up because cron value is 4")
        );

        let mut eval = evaluation(&[("count", "1")]);
        strategy.run(&mut eval, 3).unwrap();
        assert_eq!(eval.action.direction, ScaleDirection::Down);
        assert_eq!(eval.action.count, Some(1));
    }

    #[test]
    fn no_change_leaves_count_and_reason_unset() {
        let strategy = weekend_strategy();
        let mut eval = evaluation(&[("count", "2")]);

        strategy.run(&mut eval, 2).unwrap();
        assert_eq!(eval.action.direction, ScaleDirection::None);
        assert_eq!(eval.action.count, None);
        assert_eq!(eval.action.reason, None);
    }

    #[test]
    fn error_leaves_action_untouched() {
        let strategy = weekend_strategy();
        let mut eval = evaluation(&[("count", "2"), ("hysteresis", "4,2")]);

        assert!(strategy.run(&mut eval, 3).is_err());
        assert_eq!(eval.action, ScalingAction::default());
    }

    #[test]
    fn custom_separator() {
        let options = StrategyOptions {
            separator: "=>".to_string(),
        };
        let strategy = CronStrategy::new(options).with_clock(FixedClock(saturday_10am()));
        let mut eval = evaluation(&[("period_all", "* * * * * * * => 6")]);

        strategy.run(&mut eval, 2).unwrap();
        assert_eq!(eval.action.count, Some(6));
    }

    struct ConstantEvaluator(i64);

    impl Evaluator for ConstantEvaluator {
        fn evaluate(&self, formula: &str, _bindings: &Bindings<'_>) -> ExprResult<i64> {
            if formula == "fail" {
                return Err(ExprError::Empty);
            }
            Ok(self.0)
        }
    }

    #[test]
    fn evaluator_is_swappable() {
        let strategy = weekend_strategy().with_evaluator(ConstantEvaluator(9));
        let mut eval = evaluation(&[
            ("expression_any", "whatever"),
            ("expression_bad", "fail"),
            ("count", "any"),
        ]);

        strategy.run(&mut eval, 2).unwrap();
        assert_eq!(eval.action.count, Some(9));
    }
}
