//! Wallet Watch
//!
//! Polls a block explorer for new transactions on a set of wallets,
//! announces them on Telegram and records the last seen transaction per
//! wallet so the next run only reports what is new.

mod config;
mod processor;
mod runner;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use wallet_watch_alerts::{LogSink, TelegramNotifier};
use wallet_watch_engine::StateStore;
use wallet_watch_explorer::ExplorerClient;

use crate::config::AppConfig;
use crate::runner::run_once;

/// Wallet Watch CLI
#[derive(Parser, Debug)]
#[command(name = "wallet-watch")]
#[command(about = "Notify Telegram about new wallet transactions", long_about = None)]
struct Args {
    /// State file path, overrides STATE_FILE
    #[arg(short, long)]
    state_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log notifications instead of sending them and leave state untouched
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match AppConfig::from_env(!args.dry_run) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = args.state_file {
        config.state_file = path;
    }

    info!("Starting Wallet Watch");
    info!("  Wallets: {}", config.wallets.len());
    info!("  Init mode: {}", config.init_mode.as_str());
    info!("  State file: {}", config.state_file.display());
    info!("  Explorer: {}", config.explorer.base_url);
    if args.dry_run {
        info!("  Dry run: notifications are logged, state is not saved");
    }

    let source = match ExplorerClient::new(config.explorer.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create explorer client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut store = StateStore::load(&config.state_file);
    info!("Loaded state for {} wallets", store.len());

    let summary = if args.dry_run {
        run_once(&config, &source, &LogSink, &mut store).await
    } else {
        let notifier = TelegramNotifier::new(config.telegram.clone());
        run_once(&config, &source, &notifier, &mut store).await
    };
    summary.log();

    if args.dry_run {
        return ExitCode::SUCCESS;
    }

    if let Err(e) = store.save() {
        error!("Failed to save state to {}: {}", store.path().display(), e);
        return ExitCode::FAILURE;
    }
    info!("State saved to {}", store.path().display());

    ExitCode::SUCCESS
}
