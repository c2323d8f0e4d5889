use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use cronscale_strategy::runner::BoxFuture;
use cronscale_strategy::{CheckRunner, LocalClock, UtcClock};

use super::{load_check, load_metrics, strategy_with};

pub struct WatchArgs {
    pub config: PathBuf,
    pub check: String,
    pub count: i64,
    pub metrics: Option<PathBuf>,
    pub interval: u64,
    pub utc: bool,
}

pub async fn watch(args: WatchArgs) -> anyhow::Result<()> {
    let (options, check) = load_check(&args.config, &args.check)?;
    // Fail fast on an unreadable metrics file before the first tick.
    load_metrics(args.metrics.as_deref())?;

    let strategy = if args.utc {
        strategy_with(options, UtcClock)
    } else {
        strategy_with(options, LocalClock)
    };

    let metrics_path = args.metrics.clone();
    let mut runner = CheckRunner::new(strategy, check, args.count)
        .with_metrics(Box::new(move || load_metrics(metrics_path.as_deref())))
        .with_scale_fn(Box::new(|name: &str, target: i64| -> BoxFuture {
            println!("{name}: scale to {target}");
            Box::pin(async { Ok::<(), anyhow::Error>(()) })
        }));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown signal received"),
            Err(e) => warn!(error = %e, "failed to listen for Ctrl-C, stopping"),
        }
        let _ = shutdown_tx.send(true);
    });

    info!(
        check = %args.check,
        count = args.count,
        interval = args.interval,
        "watching check"
    );
    runner
        .run(Duration::from_secs(args.interval), shutdown_rx)
        .await;

    println!("{}: final count {}", args.check, runner.count());
    Ok(())
}
