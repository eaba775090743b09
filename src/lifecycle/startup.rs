//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate the initial configuration
//! - Start the config watcher
//! - Bind the listener and begin serving scrapes
//!
//! # Design Decisions
//! - Fail fast: an invalid initial configuration is fatal, nothing binds
//! - Listener starts last (traffic only when ready)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::{load_config, ConfigError, ConfigStore, ConfigWatcher};
use crate::http::{AppState, MetricsServer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Errors that stop the exporter from starting or finishing cleanly.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load initial configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to watch configuration file: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Everything needed to start the exporter.
#[derive(Clone)]
pub struct Settings {
    pub config_file: PathBuf,
    pub listen_address: String,
    pub request_timeout: Duration,
    /// Global self-telemetry handle, if a recorder was installed.
    pub telemetry: Option<PrometheusHandle>,
}

/// A running exporter.
pub struct Exporter {
    local_addr: SocketAddr,
    store: Arc<ConfigStore>,
    shutdown: Shutdown,
    server: JoinHandle<Result<(), std::io::Error>>,
    watcher: JoinHandle<()>,
}

impl Exporter {
    /// Address the scrape endpoint is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The live configuration store.
    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Stop the watcher and the server and wait for both to finish.
    pub async fn shutdown(self) -> Result<(), StartupError> {
        self.shutdown.trigger();

        if let Err(e) = self.watcher.await {
            tracing::error!(error = %e, "Config watcher task failed");
        }
        self.server.await.map_err(std::io::Error::other)??;
        Ok(())
    }
}

/// Load the configuration, start watching it and start serving.
pub async fn start(settings: Settings) -> Result<Exporter, StartupError> {
    let config = load_config(&settings.config_file)?;
    tracing::info!(
        path = %settings.config_file.display(),
        schedules = config.schedules.len(),
        localized_timezones = config.localized_timezones.len(),
        "Configuration loaded"
    );
    metrics::record_config_reload(true);

    let store = Arc::new(ConfigStore::with_config(config));
    let shutdown = Shutdown::new();

    let watcher = ConfigWatcher::new(&settings.config_file, store.clone()).spawn(shutdown.signal())?;

    let listener = TcpListener::bind(&settings.listen_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: settings.listen_address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for scrapes");

    let server = MetricsServer::new(
        AppState {
            store: store.clone(),
            telemetry: settings.telemetry,
        },
        settings.request_timeout,
    );
    let server = tokio::spawn(server.run(listener, shutdown.signal()));

    Ok(Exporter {
        local_addr,
        store,
        shutdown,
        server,
        watcher,
    })
}
