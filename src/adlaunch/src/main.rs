//! adlaunch — AI-assisted Meta Ads campaign launch service.
//!
//! Main entry point that loads configuration, wires the planner and the
//! Graph API client into the launch sequencer, and starts the server.

use adlaunch_api::{ApiServer, AppState};
use adlaunch_core::config::AppConfig;
use adlaunch_meta::{AdsApi, GraphClient, LaunchSequencer};
use adlaunch_planner::PlanGenerator;
use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "adlaunch")]
#[command(about = "AI-assisted Meta Ads campaign launch service")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "ADLAUNCH__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "ADLAUNCH__METRICS__PORT")]
    metrics_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adlaunch=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("adlaunch starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }

    info!(
        http_port = config.api.http_port,
        graph_version = %config.meta.graph_version,
        deployment = %config.azure.deployment,
        "Configuration loaded"
    );

    // Surface absent credentials up front; affected operations are refused
    // with the same list until the settings are provided.
    let missing = config.missing_settings();
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(", "),
            "Missing required settings; plan, media, and launch operations will be refused"
        );
    }

    // Wire the Graph API client, plan generator, and launch sequencer
    let graph = Arc::new(GraphClient::new(config.meta.clone())?);
    let ads: Arc<dyn AdsApi> = graph;
    let planner = Arc::new(PlanGenerator::new(
        config.azure.clone(),
        config.defaults.clone(),
    )?);
    let sequencer = Arc::new(LaunchSequencer::new(
        ads.clone(),
        config.meta.page_id.clone(),
    ));

    let state = AppState {
        config: Arc::new(config.clone()),
        planner,
        ads,
        sequencer,
        start_time: Instant::now(),
    };

    let api_server = ApiServer::new(config, state);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("adlaunch is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
