//! Process self-telemetry.
//!
//! # Metrics
//! - `tou_exporter_config_reloads_total` (counter): reload attempts by result
//! - `tou_exporter_config_last_reload_success_timestamp_seconds` (gauge):
//!   unix time of the last configuration that was installed
//!
//! # Design Decisions
//! - Recorded through the global `metrics` recorder; without one installed
//!   the calls are no-ops, which keeps tests free of global state
//! - Rendered after the schedule gauges on every scrape

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const CONFIG_RELOADS_TOTAL: &str = "tou_exporter_config_reloads_total";
pub const CONFIG_LAST_RELOAD_SUCCESS: &str = "tou_exporter_config_last_reload_success_timestamp_seconds";

/// Install the global recorder and return a handle for rendering it.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_counter!(CONFIG_RELOADS_TOTAL, "Configuration load attempts by result");
    describe_gauge!(
        CONFIG_LAST_RELOAD_SUCCESS,
        "Unix timestamp of the last successfully installed configuration"
    );
    Ok(handle)
}

/// Record the outcome of a configuration load.
pub fn record_config_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!(CONFIG_RELOADS_TOTAL, "result" => result).increment(1);
    if success {
        gauge!(CONFIG_LAST_RELOAD_SUCCESS).set(chrono::Utc::now().timestamp() as f64);
    }
}
