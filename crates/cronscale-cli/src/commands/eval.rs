use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDateTime, Utc};
use serde::Serialize;

use cronscale_core::{ScaleDirection, ScalingEvaluation};
use cronscale_strategy::FixedClock;

use super::{load_check, load_metrics, strategy_with};

const AT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub struct EvalArgs {
    pub config: PathBuf,
    pub check: String,
    pub count: i64,
    pub metrics: Option<PathBuf>,
    pub at: Option<String>,
    pub utc: bool,
}

#[derive(Debug, Serialize)]
pub struct EvalReport {
    pub check: String,
    pub evaluated_at: NaiveDateTime,
    pub current_count: i64,
    pub direction: ScaleDirection,
    pub count: Option<i64>,
    pub reason: Option<String>,
}

pub fn eval(args: &EvalArgs, json: bool) -> anyhow::Result<()> {
    let report = evaluate(args)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_report(&report));
    }
    Ok(())
}

pub fn evaluate(args: &EvalArgs) -> anyhow::Result<EvalReport> {
    let (options, check) = load_check(&args.config, &args.check)?;
    let metrics = load_metrics(args.metrics.as_deref())?;

    // Pin the instant so the report shows what periods were matched against.
    let now = match &args.at {
        Some(at) => parse_at(at)?,
        None if args.utc => Utc::now().naive_utc(),
        None => Local::now().naive_local(),
    };
    let strategy = strategy_with(options, FixedClock(now));

    let mut evaluation = ScalingEvaluation::new(check, metrics);
    strategy
        .run(&mut evaluation, args.count)
        .with_context(|| format!("evaluating check {}", args.check))?;

    Ok(EvalReport {
        check: evaluation.check.name,
        evaluated_at: now,
        current_count: args.count,
        direction: evaluation.action.direction,
        count: evaluation.action.count,
        reason: evaluation.action.reason,
    })
}

fn parse_at(value: &str) -> anyhow::Result<NaiveDateTime> {
    AT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .with_context(|| format!("invalid --at time '{value}', expected YYYY-MM-DDTHH:MM[:SS]"))
}

pub fn format_report(report: &EvalReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Check:     {}\n", report.check));
    out.push_str(&format!("Evaluated: {}\n", report.evaluated_at));
    out.push_str(&format!("Direction: {}\n", report.direction));
    match report.count {
        Some(count) => out.push_str(&format!("Count:     {} → {}", report.current_count, count)),
        None => out.push_str(&format!("Count:     {} (unchanged)", report.current_count)),
    }
    if let Some(reason) = &report.reason {
        out.push_str(&format!("\nReason:    {reason}"));
    }
    out
}
