//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the scrape, landing and health handlers
//! - Wire up middleware (tracing, request timeout)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ConfigStore;
use crate::exporter::{render, Collector};
use crate::lifecycle::ShutdownSignal;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const INDEX_PAGE: &str = r#"<html>
<head><title>Time of Use Exporter</title></head>
<body>
<h1>Time of Use Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>"#;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    /// Process self-telemetry appended to every scrape, when installed.
    pub telemetry: Option<PrometheusHandle>,
}

/// HTTP server exposing the time-of-use metrics.
pub struct MetricsServer {
    router: Router,
}

impl MetricsServer {
    pub fn new(state: AppState, request_timeout: Duration) -> Self {
        Self {
            router: Self::build_router(state, request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.recv().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// One collection pass: a single snapshot and a single instant.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.store.get();
    let now = Utc::now();

    let mut body = render(&Collector::new(&config), now);
    if let Some(handle) = &state.telemetry {
        if !body.is_empty() && !body.ends_with('\n') {
            body.push('\n');
        }
        body.push_str(&handle.render());
    }

    tracing::debug!(
        schedules = config.schedules.len(),
        localized_timezones = config.localized_timezones.len(),
        "Served scrape"
    );
    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn health_handler() -> &'static str {
    "ok"
}
