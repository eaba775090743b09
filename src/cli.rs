//! Command line and environment settings.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::lifecycle::startup::Settings;

#[derive(Debug, Parser)]
#[command(name = "tou-exporter")]
#[command(about = "Prometheus exporter for time-of-use schedules", long_about = None, version)]
pub struct Cli {
    /// Schedule configuration file (.yaml/.yml for YAML, anything else is TOML)
    #[arg(short, long, env = "CONFIG_FILE", default_value = "./config.yaml")]
    pub config_file: PathBuf,

    /// Address the scrape endpoint binds to
    #[arg(short, long, env = "LISTEN_ADDRESS", default_value = "0.0.0.0:8080")]
    pub listen_address: String,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Per-request timeout for the HTTP endpoint
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Do not append the exporter's own reload metrics to scrapes
    #[arg(long, env = "DISABLE_SELF_METRICS")]
    pub disable_self_metrics: bool,
}

impl Cli {
    /// Startup settings described by these arguments.
    pub fn settings(&self) -> Settings {
        Settings {
            config_file: self.config_file.clone(),
            listen_address: self.listen_address.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            telemetry: None,
        }
    }
}
