use std::process::ExitCode;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use transit_router::config::ServerConfig;
use transit_router::store::{GraphStore, MapSource};
use transit_router::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Load map data (fail fast if unavailable)
    info!(path = %config.map_data_path.display(), "loading map data");
    let source = MapSource::File(config.map_data_path.clone());
    let store = match GraphStore::open(source).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to load map data");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(store, &config.cache);

    if let Some(every) = config.reload_interval {
        spawn_reloader(state.clone(), every);
    }

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!("Transit router listening on http://{}", config.bind_addr);
    info!("  GET  /health           - Health check");
    info!("  POST /api/path         - Plan a route");
    info!("  GET  /api/nodes        - List nodes");
    info!("  GET  /api/nodes/:id    - Look up a node");
    info!("  GET  /api/search?q=    - Search nodes by name");
    info!("  POST /api/reload       - Reload map data");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Reload the map data periodically; a failed reload keeps the old graph.
fn spawn_reloader(state: AppState, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            if state.store.reload().await.is_ok() {
                state.routes.invalidate_all();
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
