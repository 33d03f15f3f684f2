use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use player_registry::{
    build_router,
    config::{AppConfig, Cli},
    seed,
    state::AppState,
    store::{InMemoryPlayerStore, PlayerStore},
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()
        .context("failed to load application configuration")?
        .with_cli(Cli::parse());

    let store: Arc<dyn PlayerStore> = match config.max_players {
        Some(max) => {
            info!(max_players = max, "player store capacity limited");
            Arc::new(InMemoryPlayerStore::with_max_players(max))
        }
        None => Arc::new(InMemoryPlayerStore::new()),
    };
    let state = AppState::new(store);

    if let Some(path) = &config.seed_file {
        let forms = seed::load_forms(path)?;
        seed::seed_players(&state.service, forms)
            .await
            .with_context(|| format!("failed to seed players from {}", path.display()))?;
    }

    let app = build_router(state);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "player registry started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("player_registry=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
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
}
