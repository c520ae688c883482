//! API server — HTTP router and Prometheus metrics listener.

use crate::rest::{self, AppState};
use adlaunch_core::config::AppConfig;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router with all endpoints and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Plan / media / launch / status
        .route("/api/v1/plan", post(rest::generate_plan))
        .route("/api/v1/media", post(rest::upload_media))
        .route("/api/v1/launch", post(rest::launch_campaign))
        .route("/api/v1/status", get(rest::entity_status))
        .route("/api/v1/ads/:id/pause", post(rest::pause_ad))
        .route("/api/v1/ads/:id/resume", post(rest::resume_ad))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main API server managing the REST endpoints.
pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Start the HTTP REST server. Blocks until shutdown.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(self.state.clone());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);
        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
