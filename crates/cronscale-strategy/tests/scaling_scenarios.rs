//! End-to-end scenarios for the cron strategy.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

use cronscale_core::{ScaleDirection, ScalingCheck, ScalingEvaluation, TimestampedMetric};
use cronscale_expr::{Bindings, Evaluator, FormulaEvaluator};
use cronscale_strategy::{
    CheckConfig, CronStrategy, FixedClock, Strategy, StrategyError, StrategyOptions,
    TargetCalculator,
};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn wednesday_10am() -> NaiveDateTime {
    at(2026, 10, 21, 10, 0)
}

fn saturday_10am() -> NaiveDateTime {
    at(2026, 10, 24, 10, 0)
}

fn config(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn metrics(values: &[f64]) -> Vec<TimestampedMetric> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            TimestampedMetric::new(
                Utc.with_ymd_and_hms(2026, 10, 21, 9, i as u32, 0).unwrap(),
                *v,
            )
        })
        .collect()
}

fn strategy() -> CronStrategy {
    CronStrategy::new(StrategyOptions::default())
}

fn run_at(now: NaiveDateTime, entries: &[(&str, &str)], count: i64, values: &[f64]) -> ScalingEvaluation {
    let strategy = strategy().with_clock(FixedClock(now));
    let mut eval = ScalingEvaluation::new(
        ScalingCheck {
            name: "web".to_string(),
            config: config(entries),
        },
        metrics(values),
    );
    strategy.run(&mut eval, count).unwrap();
    eval
}

#[test]
fn no_matching_rule_falls_back_to_count() {
    let entries = [("count", "2"), ("period_weekend", "* * * * * sat,sun * -> 6")];
    let eval = run_at(wednesday_10am(), &entries, 2, &[]);
    assert_eq!(eval.action.direction, ScaleDirection::None);
    assert_eq!(eval.action.count, None);
}

#[test]
fn single_matching_rule_ignores_metrics() {
    let entries = [("count", "1"), ("period_all", "* * * * * * * -> 5")];
    for values in [&[][..], &[1.0][..], &[1000.0, 0.0][..]] {
        let eval = run_at(wednesday_10am(), &entries, 1, values);
        assert_eq!(eval.action.count, Some(5));
        assert_eq!(eval.action.direction, ScaleDirection::Up);
    }
}

#[test]
fn expression_driven_count() {
    let entries = [
        ("count", "1"),
        ("expression_a", "MetricsMax > 5 ? 7 : 5"),
        ("period_all", "* * * * * * * -> a"),
    ];

    let table = TargetCalculator {
        separator: "->",
        evaluator: &FormulaEvaluator,
    }
    .expression_table(&CheckConfig::from_map(&config(&entries)), 1, &metrics(&[2.0, 9.0, 4.0]));
    assert_eq!(table.get("a"), Some(7));
    assert_eq!(table.len(), 1);

    let eval = run_at(wednesday_10am(), &entries, 1, &[2.0, 9.0, 4.0]);
    assert_eq!(eval.action.count, Some(7));

    let eval = run_at(wednesday_10am(), &entries, 1, &[2.0, 3.0]);
    assert_eq!(eval.action.count, Some(5));
}

#[test]
fn weekday_business_hours_window() {
    let entries = [("count", "1"), ("period_business", "* * 9-17 * * mon-fri * -> 5")];

    let eval = run_at(wednesday_10am(), &entries, 1, &[]);
    assert_eq!(eval.action.count, Some(5));

    let eval = run_at(saturday_10am(), &entries, 1, &[]);
    assert_eq!(eval.action.direction, ScaleDirection::None);
}

#[test]
fn overnight_window_crosses_midnight() {
    let entries = [("count", "4"), ("period_night", "* * 22-2 * * * * -> 1")];

    let eval = run_at(at(2026, 10, 21, 23, 15), &entries, 4, &[]);
    assert_eq!(eval.action.count, Some(1));

    let eval = run_at(at(2026, 10, 22, 1, 45), &entries, 4, &[]);
    assert_eq!(eval.action.count, Some(1));

    let eval = run_at(at(2026, 10, 22, 3, 0), &entries, 4, &[]);
    assert_eq!(eval.action.direction, ScaleDirection::None);
}

#[test]
fn simultaneous_matches_resolve_deterministically() {
    let entries = [
        ("count", "1"),
        ("expression_a", "9"),
        ("period_x", "* * * * * * * -> a"),
        ("period_y", "* * * * * * * -> 1"),
    ];

    let first = run_at(wednesday_10am(), &entries, 3, &[]);
    for _ in 0..20 {
        let again = run_at(wednesday_10am(), &entries, 3, &[]);
        assert_eq!(again.action, first.action);
    }
    // "1" sorts before "a".
    assert_eq!(first.action.count, Some(1));
}

#[test]
fn hysteresis_exact_top_threshold_boundary() {
    // From exactly 6 the bracket's lower edge is 6, so 5 is allowed.
    let entries = [("count", "5"), ("hysteresis", "2,4,6")];
    let eval = run_at(wednesday_10am(), &entries, 6, &[]);
    assert_eq!(eval.action.direction, ScaleDirection::Down);
    assert_eq!(eval.action.count, Some(5));
}

#[test]
fn hysteresis_pass_through_to_lower_edge() {
    let entries = [("count", "2"), ("hysteresis", "2,4,6")];
    let eval = run_at(wednesday_10am(), &entries, 6, &[]);
    assert_eq!(eval.action.count, Some(2));
}

#[test]
fn hysteresis_suppresses_drop_inside_bracket() {
    let entries = [
        ("count", "3"),
        ("hysteresis", "2,10"),
        ("period_busy", "* * 9-17 * * mon-fri * -> 12"),
    ];

    // Office hours push the count up past the top threshold.
    let eval = run_at(wednesday_10am(), &entries, 3, &[]);
    assert_eq!(eval.action.count, Some(12));

    // From 8 (inside [2, 10)) a drop to 3 is held.
    let eval = run_at(saturday_10am(), &entries, 8, &[]);
    assert_eq!(eval.action.direction, ScaleDirection::None);
}

#[test]
fn malformed_hysteresis_is_rejected() {
    let strategy = strategy().with_clock(FixedClock(wednesday_10am()));
    let mut eval = ScalingEvaluation::new(
        ScalingCheck {
            name: "web".to_string(),
            config: config(&[("count", "2"), ("hysteresis", "4,2")]),
        },
        Vec::new(),
    );

    let err = strategy.run(&mut eval, 3).unwrap_err();
    assert!(matches!(err, StrategyError::InvalidHysteresis { .. }));
    assert!(err.to_string().contains("hysteresis"));
    assert_eq!(eval.action.direction, ScaleDirection::None);
    assert_eq!(eval.action.count, None);
}

#[test]
fn calculation_is_idempotent() {
    let strategy = strategy();
    let entries = config(&[
        ("count", "base"),
        ("expression_base", "ceil(MetricsAvg / 10)"),
        ("expression_peak", "max(MetricsMax / 10, Count + 1)"),
        ("hysteresis", "2,base,20"),
        ("period_lunch", "* 0-59 12 * * mon-fri * -> peak"),
    ]);
    let series = metrics(&[40.0, 55.0, 61.0]);

    let first = strategy
        .calculate_target_count(&entries, 4, &series, at(2026, 10, 21, 12, 30))
        .unwrap();
    for _ in 0..10 {
        let again = strategy
            .calculate_target_count(&entries, 4, &series, at(2026, 10, 21, 12, 30))
            .unwrap();
        assert_eq!(again, first);
    }
    // max(6.1, 5) → 6
    assert_eq!(first, 6);
}

#[test]
fn evaluator_trait_is_object_safe() {
    let evaluator: Box<dyn Evaluator> = Box::new(FormulaEvaluator);
    let series = metrics(&[1.0, 2.0]);
    assert_eq!(
        evaluator.evaluate("MetricsLast + Count", &Bindings::new(3, &series)),
        Ok(5)
    );
}
