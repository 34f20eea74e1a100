//! CareCom CLI - command line client for the TB CareCom backend

mod commands;
mod config;
mod logging;
mod terminal;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{Commands, Context};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, error, warn};

#[derive(Parser)]
#[command(name = "carecom")]
#[command(about = "Command line client for the TB CareCom backend")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Data directory for the session, configuration and logs
    #[arg(short = 'd', long, global = true, env = "CARECOM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to <data-dir>/carecom.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds, overriding the configuration
    #[arg(short = 't', long, global = true)]
    timeout: Option<u64>,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = carecom_core::resolve_data_dir(cli.data_dir);

    logging::init_logging(cli.log_level.into(), &data_dir, cli.no_file_log)?;
    debug!(data_dir = %data_dir.display(), "starting carecom");

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            interrupt.cancel();
        }
    });

    let ctx = Context {
        data_dir,
        config_path: cli.config,
        timeout: cli.timeout,
        cancel: cancel.clone(),
    };

    let outcome = tokio::select! {
        outcome = cli.command.execute(&ctx) => outcome,
        () = cancel.cancelled() => Err(anyhow::anyhow!("interrupted")),
    };

    if let Err(e) = outcome {
        error!("Command failed: {e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}
