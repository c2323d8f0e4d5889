pub mod eval;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use cronscale_core::{CronScaleConfig, ScalingCheck, TimestampedMetrics, read_metrics};
use cronscale_strategy::{Clock, CronStrategy, Strategy, StrategyOptions};

/// Load the config file and pick out one check.
fn load_check(config: &Path, check: &str) -> anyhow::Result<(StrategyOptions, ScalingCheck)> {
    let file = CronScaleConfig::from_file(config)?;
    let options = StrategyOptions::from_map(&file.strategy);
    let check = file.check(check)?;
    Ok((options, check))
}

fn load_metrics(path: Option<&Path>) -> anyhow::Result<TimestampedMetrics> {
    match path {
        Some(path) => Ok(read_metrics(path)?),
        None => Ok(Vec::new()),
    }
}

fn strategy_with<C: Clock + 'static>(options: StrategyOptions, clock: C) -> Arc<dyn Strategy> {
    Arc::new(CronStrategy::new(options).with_clock(clock))
}
