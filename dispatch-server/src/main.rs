use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dispatch_server::config::{ConfigError, ServerConfig};
use dispatch_server::dispatch::ChannelRegistry;
use dispatch_server::map::{MapLoadError, load_map};
use dispatch_server::planner::RoutePlanner;
use dispatch_server::web::{AppState, create_router};

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "dispatch_server=info,tower_http=info";

/// Anything that stops the server from starting or serving.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Map(#[from] MapLoadError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "dispatch server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;

    // The map must load before anything is served.
    let graph = load_map(&config.map_path)?;
    let planner = RoutePlanner::new(Arc::new(graph), config.search.clone());

    let state = AppState::new(planner, ChannelRegistry::new());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        heuristic = %config.search.heuristic,
        "dispatch server listening"
    );
    info!("  GET  /health            - Health check");
    info!("  GET  /api/map           - Map and connection summary");
    info!("  POST /api/trip/request  - Plan a trip and dispatch it");
    info!("  GET  /ws                - Vehicle/observer WebSocket");

    axum::serve(listener, app).await?;
    Ok(())
}
