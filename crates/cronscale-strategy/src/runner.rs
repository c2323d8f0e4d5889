//! Check runner — evaluates one scaling check on an interval.
//!
//! Stands in for the host: pulls metrics, runs the strategy, hands any
//! new count to a callback, and carries it forward as the next current
//! count.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use cronscale_core::{ScaleDirection, ScalingAction, ScalingCheck, ScalingEvaluation, TimestampedMetrics};

use crate::strategy::Strategy;

/// Supplies the metric series for each evaluation.
pub type MetricsSource = Box<dyn Fn() -> anyhow::Result<TimestampedMetrics> + Send + Sync>;

/// Callback type for performing scaling actions.
///
/// The runner calls this with (check_name, target_count).
pub type ScaleCallback = Box<dyn Fn(&str, i64) -> BoxFuture + Send + Sync>;

pub type BoxFuture = std::pin::Pin<
    Box<dyn std::future::Future<Output = anyhow::Result<()>> + Send>,
>;

/// Repeatedly evaluates a single scaling check.
pub struct CheckRunner {
    strategy: Arc<dyn Strategy>,
    check: ScalingCheck,
    /// Count the next evaluation starts from.
    count: i64,
    metrics: MetricsSource,
    /// Callback to perform scaling.
    scale_fn: Option<ScaleCallback>,
}

impl CheckRunner {
    pub fn new(strategy: Arc<dyn Strategy>, check: ScalingCheck, count: i64) -> Self {
        Self {
            strategy,
            check,
            count,
            metrics: Box::new(|| Ok::<_, anyhow::Error>(Vec::new())),
            scale_fn: None,
        }
    }

    pub fn with_metrics(mut self, source: MetricsSource) -> Self {
        self.metrics = source;
        self
    }

    /// Set the callback used to perform scaling.
    pub fn with_scale_fn(mut self, f: ScaleCallback) -> Self {
        self.scale_fn = Some(f);
        self
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Run one evaluation and apply its result.
    ///
    /// The current count only moves when the strategy succeeds and the
    /// scale callback (if any) does not fail.
    pub async fn tick(&mut self) -> anyhow::Result<ScalingAction> {
        let metrics = (self.metrics)()?;
        let mut eval = ScalingEvaluation::new(self.check.clone(), metrics);
        self.strategy.run(&mut eval, self.count)?;

        let action = eval.action;
        let target = match (action.direction, action.count) {
            (ScaleDirection::None, _) | (_, None) => {
                debug!(check = %self.check.name, count = self.count, "no scaling needed");
                return Ok(action);
            }
            (_, Some(target)) => target,
        };

        if let Some(ref scale_fn) = self.scale_fn {
            scale_fn(&self.check.name, target).await?;
        }

        info!(
            check = %self.check.name,
            from = self.count,
            to = target,
            direction = %action.direction,
            reason = action.reason.as_deref().unwrap_or_default(),
            "scaling"
        );
        self.count = target;
        Ok(action)
    }

    /// Run the evaluation loop until `shutdown` changes.
    pub async fn run(
        &mut self,
        interval: Duration,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) {
        info!(
            check = %self.check.name,
            interval_secs = interval.as_secs(),
            "check runner started"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = self.tick().await {
                        warn!(check = %self.check.name, error = %e, "evaluation failed, keeping current count");
                    }
                }
                _ = shutdown.changed() => {
                    info!(check = %self.check.name, count = self.count, "check runner shutting down");
                    break;
                }
            }
        }
    }
}
