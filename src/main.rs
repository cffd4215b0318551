use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sentinel::config::{Config, ConfigManager, Logging};
use sentinel::monitor::WatchlistMonitor;
use sentinel::util::cache::SystemClock;
use sentinel::util::display::{paint, print_report};
use sentinel::{risk_badge, ChainId, DexScreenerClient, RiskLevel, SafetyScorer};

/// Token safety scorer backed by DexScreener market data
#[derive(Parser, Debug)]
#[clap(name = "sentinel", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults apply when it does not exist)
    #[clap(short, long, value_name = "FILE", default_value = "sentinel.toml")]
    config: PathBuf,

    /// Log level when RUST_LOG is unset (overrides the config file)
    #[clap(short, long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every safety check and print the report
    Analyze {
        chain: ChainId,
        address: String,
        /// Print the report as JSON
        #[clap(long)]
        json: bool,
    },

    /// Print only the 0-100 risk score
    Score { chain: ChainId, address: String },

    /// Show display metadata for a risk tier
    Badge { tier: RiskLevel },

    /// Re-score the configured watchlist until interrupted
    Watch,
}

fn init_tracing(logging: &Logging, level: Option<&str>) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&logging.directory)
        .with_context(|| format!("creating log directory {}", logging.directory))?;

    let file_appender = tracing_appender::rolling::daily(&logging.directory, &logging.file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // Console goes to stderr so JSON output on stdout stays clean
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .json()
        .with_current_span(false)
        .with_span_list(true);

    let default_level = level.unwrap_or(logging.level.as_str());
    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    Ok(guard)
}

fn build_client(config: &Config) -> Result<Arc<DexScreenerClient>> {
    let client = DexScreenerClient::with_settings(&config.api, Arc::new(SystemClock))
        .context("building DexScreener client")?;
    Ok(Arc::new(client))
}

async fn watch(cli: &Cli, config: &Config) -> Result<()> {
    let manager = Arc::new(ConfigManager::new(&cli.config)?);
    let reloader = manager.start_hot_reload(std::time::Duration::from_secs(
        config.watch.reload_interval_secs.max(1),
    ));

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let monitor = WatchlistMonitor::new(build_client(config)?, Arc::clone(&manager));
    let task = tokio::spawn(monitor.run(shutdown_rx));

    match signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }

    let _ = shutdown_tx.send(());
    reloader.abort();
    task.await.context("watch task panicked")??;

    info!("👋 Sentinel shutdown complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config)?;
    let _guard = init_tracing(&config.logging, cli.log_level.as_deref())?;

    match &cli.command {
        Commands::Analyze {
            chain,
            address,
            json,
        } => {
            let scorer = SafetyScorer::new(build_client(&config)?)
                .with_thresholds(config.thresholds.clone());
            let report = scorer.analyze(*chain, address).await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Score { chain, address } => {
            let scorer = SafetyScorer::new(build_client(&config)?)
                .with_thresholds(config.thresholds.clone());
            println!("{}", scorer.quick_risk_score(*chain, address).await);
        }
        Commands::Badge { tier } => {
            let badge = risk_badge(*tier);
            println!(
                "{} {} {}",
                badge.emoji,
                paint(badge.text, *tier),
                badge.color
            );
        }
        Commands::Watch => watch(&cli, &config).await?,
    }

    Ok(())
}
