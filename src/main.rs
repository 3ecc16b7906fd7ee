use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

use preapproval::api::{create_router, AppState};
use preapproval::auth::ApiKeyGuard;
use preapproval::config::Config;
use preapproval::observability::{init_tracing, MetricsRegistry};
use preapproval::rules::RuleSet;
use preapproval::storage::SqliteStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let dotenv = dotenvy::dotenv();

    // Parse configuration
    let config = Config::parse();

    // Initialize tracing
    init_tracing(&config.log_level)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting mortgage pre-approval API"
    );
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }
    if config.uses_default_api_key() {
        warn!("API_KEY not set, using the built-in development key");
    }

    // Open storage and apply the schema
    let storage = SqliteStorage::connect(&config.database_url, config.db_max_connections).await?;
    storage.run_migrations().await?;
    info!(database_url = %config.database_url, "Storage ready");

    // Create application state
    let state = Arc::new(AppState {
        storage: Arc::new(storage),
        guard: ApiKeyGuard::new(config.api_key.clone()),
        rules: Arc::new(RuleSet::standard()),
        metrics: Arc::new(MetricsRegistry::new()),
        start_time: Instant::now(),
    });

    // Create router
    let app = create_router(state);

    // Parse listen address
    let addr: SocketAddr = config.listen_addr.parse()?;

    info!(addr = %addr, "Starting HTTP server");

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run server with graceful shutdown
    if config.graceful_shutdown {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        axum::serve(listener, app).await?;
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
