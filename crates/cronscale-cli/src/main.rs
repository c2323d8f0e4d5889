use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "cronscale",
    about = "cronscale — schedule-driven instance counts",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a scaling check once and print the decision
    Eval {
        /// Path to cronscale.toml
        #[arg(short, long, default_value = "cronscale.toml")]
        config: PathBuf,
        /// Name of the check under [checks]
        #[arg(long)]
        check: String,
        /// Current instance count
        #[arg(long)]
        count: i64,
        /// JSON file of {"timestamp", "value"} samples
        #[arg(short, long)]
        metrics: Option<PathBuf>,
        /// Evaluate at this time instead of now (e.g. 2026-10-21T10:00:00)
        #[arg(long)]
        at: Option<String>,
        /// Match periods against UTC instead of local time
        #[arg(long)]
        utc: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Re-evaluate a scaling check on an interval until Ctrl-C.
    ///
    /// Each new count is carried forward as the current count of the
    /// next evaluation. The metrics file, if given, is re-read every tick.
    Watch {
        /// Path to cronscale.toml
        #[arg(short, long, default_value = "cronscale.toml")]
        config: PathBuf,
        /// Name of the check under [checks]
        #[arg(long)]
        check: String,
        /// Starting instance count
        #[arg(long)]
        count: i64,
        /// JSON file of {"timestamp", "value"} samples
        #[arg(short, long)]
        metrics: Option<PathBuf>,
        /// Seconds between evaluations (at least 1)
        #[arg(short, long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,
        /// Match periods against UTC instead of local time
        #[arg(long)]
        utc: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cronscale=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            config,
            check,
            count,
            metrics,
            at,
            utc,
            format,
        } => {
            let args = commands::eval::EvalArgs {
                config,
                check,
                count,
                metrics,
                at,
                utc,
            };
            commands::eval::eval(&args, matches!(format, OutputFormat::Json))
        }
        Commands::Watch {
            config,
            check,
            count,
            metrics,
            interval,
            utc,
        } => {
            let args = commands::watch::WatchArgs {
                config,
                check,
                count,
                metrics,
                interval,
                utc,
            };
            commands::watch::watch(args).await
        }
    }
}
