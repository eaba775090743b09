//! Time-of-use exporter.
//!
//! Evaluates time-of-use schedules against the current time in their own
//! timezones and serves the result as Prometheus gauges.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ watcher ──▶ loader ──▶ validation ──▶ ConfigStore (ArcSwap)
//!                                                              │
//!   GET /metrics ──▶ http server ──▶ snapshot + Utc::now() ◀────┘
//!                                        │
//!                                        ▼
//!                          schedule matcher ──▶ projection ──▶ Prometheus text
//! ```

use clap::Parser;

use tou_exporter::cli::Cli;
use tou_exporter::lifecycle::{self, signals};
use tou_exporter::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tou-exporter starting");

    let mut settings = cli.settings();
    if !cli.disable_self_metrics {
        match metrics::init_metrics() {
            Ok(handle) => settings.telemetry = Some(handle),
            Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
        }
    }

    let exporter = match lifecycle::start(settings).await {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            std::process::exit(1);
        }
    };

    signals::wait_for_signal().await;
    exporter.shutdown().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
