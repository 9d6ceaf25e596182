mod types;
mod api;
mod dashboard;
mod engine;
mod config;
mod ui;

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::api::{BotApi, HttpBotClient};
use crate::config::{ClientConfig, DEFAULT_CONFIG_FILE};
use crate::dashboard::{ClientState, FieldId, SettingsForm};
use crate::engine::{poll_cycle, FeedSequencer};
use crate::types::BotCommand;
use crate::ui::{run_dashboard, snapshot_text};

#[derive(Parser)]
#[command(name = "trader-dashboard")]
#[command(author = "Trading Bot")]
#[command(version = "0.1.0")]
#[command(about = "Terminal dashboard for the crypto trading bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Bot API base URL (overrides the config file)
    #[arg(short, long)]
    url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Run {
        /// Section to open on, e.g. `trades` or `#settings`
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Print the bot status and stored settings
    Status,
    /// Fetch every feed once and print it
    Snapshot,
    /// Start the trading bot
    Start,
    /// Stop the trading bot
    Stop,
    /// Push new settings; percent fields take percent values (2.5 = 2.5%)
    SetSettings {
        /// Seconds between trading cycles
        #[arg(long)]
        check_interval: Option<u64>,
        #[arg(long)]
        max_risk_per_trade: Option<Decimal>,
        #[arg(long)]
        sentiment_threshold: Option<Decimal>,
        #[arg(long)]
        rebalance_threshold: Option<Decimal>,
        #[arg(long)]
        volatility_threshold: Option<Decimal>,
        #[arg(long)]
        min_trade_size: Option<Decimal>,
    },
    /// Write a default configuration file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run { section: None });

    if let Commands::InitConfig { output } = &command {
        init_logging(cli.verbose, None)?;
        ClientConfig::default().write_to(Path::new(output))?;
        return Ok(());
    }

    let mut cfg = ClientConfig::load(&cli.config)?;
    if let Some(url) = cli.url {
        cfg.base_url = url;
        cfg.validate().map_err(|errors| anyhow!(errors.join(", ")))?;
    }

    let log_file = matches!(command, Commands::Run { .. }).then_some(cfg.log_file.as_str());
    init_logging(cli.verbose, log_file)?;

    info!("Trader dashboard v0.1.0");

    let api: Arc<dyn BotApi> = Arc::new(HttpBotClient::new(&cfg.base_url, cfg.request_timeout())?);

    match command {
        Commands::Run { section } => run_dashboard(&cfg, api, section.as_deref()).await?,
        Commands::Status => show_status(api).await?,
        Commands::Snapshot => show_snapshot(api, cfg.max_toasts).await,
        Commands::Start => send_command(api, BotCommand::Start).await?,
        Commands::Stop => send_command(api, BotCommand::Stop).await?,
        Commands::SetSettings {
            check_interval,
            max_risk_per_trade,
            sentiment_threshold,
            rebalance_threshold,
            volatility_threshold,
            min_trade_size,
        } => {
            let overrides = [
                (FieldId::CheckInterval, check_interval.map(Decimal::from)),
                (FieldId::MaxRiskPerTrade, max_risk_per_trade),
                (FieldId::SentimentThreshold, sentiment_threshold),
                (FieldId::RebalanceThreshold, rebalance_threshold),
                (FieldId::VolatilityThreshold, volatility_threshold),
                (FieldId::MinTradeSize, min_trade_size),
            ];
            set_settings(api, &overrides).await?;
        }
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

/// TUI mode writes to `log_file` so log lines do not tear the screen.
/// `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: bool, log_file: Option<&str>) -> Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
    };

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_target(false)
                .with_thread_ids(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

async fn show_status(api: Arc<dyn BotApi>) -> Result<()> {
    let status = api.get_status().await?;

    println!("Status: {}", status.status);
    if let Some(start) = &status.start_time {
        println!("Started: {}", start);
    }
    if let Some(uptime) = status.uptime {
        println!("Uptime: {:.0}s", uptime);
    }

    if let Some(settings) = &status.current_settings {
        let mut form = SettingsForm::new();
        form.populate(settings);
        println!();
        for field in form.fields() {
            println!("{:<22} {}", field.id.label(), field.output_text());
        }
    }
    Ok(())
}

/// Runs one poll cycle and prints the resulting view.
async fn show_snapshot(api: Arc<dyn BotApi>, max_toasts: usize) {
    let sequencer = Arc::new(FeedSequencer::new());
    let mut state = ClientState::new(Arc::clone(&sequencer), max_toasts);
    let (tx, mut rx) = mpsc::unbounded_channel();

    // The channel closes once the status task and every feed task finish.
    poll_cycle(api, sequencer, tx, true).await;
    while let Some(update) = rx.recv().await {
        state.apply(update, Instant::now());
    }

    print!("{}", snapshot_text(&state, Local::now()));
    for toast in state.toasts.iter() {
        warn!("{}", toast.message);
    }
}

async fn send_command(api: Arc<dyn BotApi>, command: BotCommand) -> Result<()> {
    let reply = api.send_command(command).await?;
    println!("[{}] {}", reply.status, reply.message);
    if !reply.is_accepted() {
        return Err(anyhow!("{} was rejected: {}", command, reply.message));
    }
    Ok(())
}

/// Starts from the bot's stored settings so unspecified fields keep their
/// current values. Without stored settings every field must be given.
async fn set_settings(api: Arc<dyn BotApi>, overrides: &[(FieldId, Option<Decimal>)]) -> Result<()> {
    let status = api.get_status().await?;

    let mut form = SettingsForm::new();
    match &status.current_settings {
        Some(settings) => form.populate(settings),
        None if overrides.iter().all(|(_, value)| value.is_some()) => {}
        None => {
            return Err(anyhow!(
                "bot did not report its current settings; pass every setting to replace them"
            ))
        }
    }

    for (id, value) in overrides {
        if let Some(value) = value {
            form.set_value(*id, *value);
        }
    }

    let reply = api.update_settings(form.payload()).await?;
    println!("[{}] {}", reply.status, reply.message);
    if reply.status != "success" {
        return Err(anyhow!("settings update failed: {}", reply.message));
    }
    Ok(())
}
