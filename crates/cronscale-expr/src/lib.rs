//! cronscale-expr — formulas over metric aggregates.
//!
//! A formula is evaluated against the current instance count and a metric
//! series and yields an instance count.
//!
//! # Grammar
//!
//! ```text
//! expr     := ternary
//! ternary  := or ( "?" expr ":" expr )?
//! or       := and ( "||" and )*
//! and      := compare ( "&&" compare )*
//! compare  := additive ( ("=="|"!="|"<"|"<="|">"|">=") additive )?
//! additive := term ( ("+"|"-") term )*
//! term     := unary ( ("*"|"/"|"%") unary )*
//! unary    := ("-"|"!") unary | primary
//! primary  := number | "true" | "false" | ident | ident "(" args ")" | "(" expr ")"
//! ```
//!
//! Variables: `Count`, `MetricsMax`, `MetricsMin`, `MetricsAvg`,
//! `MetricsFirst`, `MetricsLast`, `MetricsSum`, `MetricsCount`.
//! Functions: `max`, `min`, `abs`, `ceil`, `floor`, `round`.
//!
//! Arithmetic is done in `f64`; the final number is truncated toward zero.
//! Formulas nesting deeper than [`MAX_DEPTH`] levels are rejected.

pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;

pub use error::{ExprError, ExprResult};
pub use eval::{Bindings, Value};
pub use parser::{Expr, MAX_DEPTH, parse};

use tracing::trace;

/// Turns a formula into an instance count.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, formula: &str, bindings: &Bindings<'_>) -> ExprResult<i64>;
}

/// The built-in formula engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaEvaluator;

impl Evaluator for FormulaEvaluator {
    fn evaluate(&self, formula: &str, bindings: &Bindings<'_>) -> ExprResult<i64> {
        let expr = parse(formula)?;
        let value = eval::evaluate(&expr, bindings)?;
        let count = eval::to_count(value)?;
        trace!(formula, ?value, count, "evaluated formula");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use cronscale_core::TimestampedMetric;

    fn metrics(max: f64) -> Vec<TimestampedMetric> {
        vec![
            TimestampedMetric::new(Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap(), 1.0),
            TimestampedMetric::new(Utc.with_ymd_and_hms(2026, 10, 19, 10, 1, 0).unwrap(), max),
        ]
    }

    #[test]
    fn conditional_on_metrics_max() {
        let formula = "MetricsMax > 5 ? 7 : 5";

        let busy = metrics(9.0);
        assert_eq!(
            FormulaEvaluator.evaluate(formula, &Bindings::new(2, &busy)),
            Ok(7)
        );

        let quiet = metrics(3.0);
        assert_eq!(
            FormulaEvaluator.evaluate(formula, &Bindings::new(2, &quiet)),
            Ok(5)
        );
    }

    #[test]
    fn proportional_formula_truncates() {
        let series = metrics(250.0);
        // 250 / 100 * 3 = 7.5 → 7
        assert_eq!(
            FormulaEvaluator.evaluate("MetricsMax / 100 * Count", &Bindings::new(3, &series)),
            Ok(7)
        );
        assert_eq!(
            FormulaEvaluator.evaluate("ceil(MetricsMax / 100 * Count)", &Bindings::new(3, &series)),
            Ok(8)
        );
    }

    #[test]
    fn errors_are_reported() {
        let series = metrics(1.0);
        let bindings = Bindings::new(1, &series);
        assert_eq!(
            FormulaEvaluator.evaluate("Cpu > 1 ? 2 : 1", &bindings),
            Err(ExprError::UnknownVariable("Cpu".to_string()))
        );
        assert_eq!(
            FormulaEvaluator.evaluate("MetricsMax > 1", &bindings),
            Err(ExprError::BooleanResult)
        );
    }
}
