//! signalx: block until a termination signal, run cleanup, exit.
//!
//! ```text
//! signalx --signal SIGTERM --signal SIGINT --timeout-ms 5000 --hook-delay-ms 1000
//! ```
//!
//! The first signal starts the cleanup hooks; a second signal, hook
//! completion or the timeout ends the wait. The process then exits with the
//! conventional `128 + signo` status.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use signalx::config::{load_config, validation::validate_config, ConfigError, WaiterConfig};
use signalx::observability::init_logging;
use signalx::{Hook, SignalWaiter};

#[derive(Parser)]
#[command(name = "signalx")]
#[command(about = "Wait for a shutdown signal and run cleanup hooks", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Signal to watch (repeatable); overrides the config file.
    #[arg(short, long = "signal")]
    signals: Vec<String>,

    /// Hook timeout in milliseconds; overrides the config file.
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// How long the simulated cleanup hook takes.
    #[arg(long, default_value_t = 0)]
    hook_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?.config,
        None => WaiterConfig::default(),
    };
    if !cli.signals.is_empty() {
        config.shutdown.signals = cli.signals.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.shutdown.timeout_ms = timeout_ms;
    }
    let signals = validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability.log_level);

    let delay = Duration::from_millis(cli.hook_delay_ms);
    let hooks = vec![
        Hook::blocking(move |signal| {
            tracing::info!(%signal, delay_ms = delay.as_millis() as u64, "Running cleanup");
            std::thread::sleep(delay);
            tracing::info!("Cleanup finished");
        }),
        Hook::future(|signal| async move {
            tracing::info!(%signal, "Notifying shutdown");
        }),
    ];

    let mut waiter = SignalWaiter::new(&signals, config.shutdown.timeout(), hooks)?;

    tracing::info!(
        signals = ?waiter.watched(),
        timeout_ms = config.shutdown.timeout_ms,
        "signalx v0.1.0 waiting for shutdown signal"
    );

    let code = match waiter.wait().await.err() {
        Some(err) => {
            tracing::info!(error = %err, "Shutdown complete");
            err.exit_code()
        }
        None => {
            tracing::warn!("Signal subscription ended without a signal");
            0
        }
    };

    std::process::exit(code);
}
