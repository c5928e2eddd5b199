//! campaign-pulse - campaign performance reports and dashboard snapshots
//!
//! Collects engagement, referral and behaviour metrics from every configured
//! source, renders daily and weekly reports, distributes them and keeps the
//! dashboard's JSON snapshots fresh.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Failure (config error, failed report cycle, server error)

mod aggregation;
mod analysis;
mod catalog;
mod cli;
mod collectors;
mod config;
mod distribution;
mod models;
mod pipeline;
mod report;
mod schedule;
mod server;
mod snapshot;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, Command};
use config::{Config, DEFAULT_CONFIG_FILE};
use models::ReportKind;
use pipeline::DeliveryMode;
use report::format::{percent, thousands};
use schedule::Schedule;
use tracing::{debug, error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if let Command::InitConfig = args.command {
        return handle_init_config();
    }

    init_logging(&args);

    info!("campaign-pulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .campaign-pulse.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set recipients, sources, schedule and snapshot paths.");
    Ok(())
}

/// Initialize logging. `RUST_LOG` wins over the verbosity flags.
fn init_logging(args: &Args) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Dispatch the subcommand. Returns the exit code.
async fn run(args: &Args) -> Result<i32> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    match args.command {
        Command::Report {
            kind,
            dry_run,
            no_send,
        } => {
            let mode = if dry_run {
                DeliveryMode::DryRun
            } else if no_send {
                DeliveryMode::NoSend
            } else {
                DeliveryMode::Send
            };
            Ok(run_report(&config, kind, mode).await)
        }
        Command::Schedule => run_schedule(&config).await.map(|_| 0),
        Command::Sync => run_sync(&config).await.map(|_| 0),
        Command::Serve { port } => server::serve(&config.server, &config.snapshots, port)
            .await
            .map(|_| 0),
        Command::InitConfig => handle_init_config().map(|_| 0),
    }
}

/// Generate one report now. Returns 1 when the cycle failed.
async fn run_report(config: &Config, kind: ReportKind, mode: DeliveryMode) -> i32 {
    println!("📊 Generating {} report...", kind.to_string().to_lowercase());
    match mode {
        DeliveryMode::DryRun => println!("   Dry run: messages are logged, not queued"),
        DeliveryMode::NoSend => println!("   No-send: report files only"),
        DeliveryMode::Send => {}
    }

    let notifier = pipeline::build_notifier(config, mode);

    match pipeline::run_and_notify(config, kind, notifier.as_ref()).await {
        Ok(outcome) => {
            let summary = &outcome.report.summary;
            println!("\n📈 {} Summary:", kind);
            println!("   Engagements: {}", thousands(summary.total_engagements));
            println!("   Conversions: {}", thousands(summary.total_conversions));
            println!("   Conversion rate: {}", percent(summary.conversion_rate));
            println!("   Alerts: {}", outcome.report.alerts.len());
            if !outcome.report.errors.is_empty() {
                println!("   ⚠️  Source errors: {}", outcome.report.errors.len());
                for e in &outcome.report.errors {
                    println!("     - {}: {}", e.source, e.error);
                }
            }
            println!("   📧 Messages: {}", outcome.delivered.len());
            println!("\n✅ Report saved to: {}", outcome.files.html.display());
            0
        }
        Err(e) => {
            eprintln!("\n❌ {} report failed: {:#}", kind, e);
            1
        }
    }
}

/// Run scheduled reports until Ctrl-C.
async fn run_schedule(config: &Config) -> Result<()> {
    let schedule = Schedule::from_config(&config.schedule)?;

    println!("⏰ Scheduler started (timezone {})", config.schedule.timezone);
    if let Some(cron) = schedule.daily_cron() {
        println!("   Daily:  {}", cron);
        info!("Daily report cron: {}", cron);
    }
    if let Some(cron) = schedule.weekly_cron() {
        println!("   Weekly: {}", cron);
        info!("Weekly report cron: {}", cron);
    }
    println!("   Press Ctrl-C to stop.");

    let notifier = pipeline::build_notifier(config, DeliveryMode::Send);
    let stop = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    schedule::run_until(&schedule, stop, |kind| {
        let notifier = notifier.as_ref();
        async move {
            // Failures are alerted and logged; the next tick still fires.
            if pipeline::run_and_notify(config, kind, notifier).await.is_ok() {
                info!("Scheduled {} report complete", kind);
            }
        }
    })
    .await;

    println!("\n👋 Scheduler stopped.");
    Ok(())
}

/// Refresh the dashboard snapshots.
async fn run_sync(config: &Config) -> Result<()> {
    println!("🔄 Syncing dashboard snapshots...");

    let outcome = pipeline::sync(config, Utc::now()).await?;

    println!("   📊 Analytics: {}", outcome.analytics.display());
    println!(
        "   🎬 Videos: {} ({} entries)",
        outcome.videos.display(),
        outcome.total_videos
    );
    println!("\n✅ Snapshots updated.");
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
