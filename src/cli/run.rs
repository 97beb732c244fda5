use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use log::{error, info};
use tokio::net::TcpListener;

use crate::agent::build_agent;
use crate::api::{create_router, AppState};
use crate::channel::build_channels;
use crate::config::GatewayConfig;
use crate::event_store::MemoryStore;
use crate::logging::init_logging;
use crate::skills::SkillRegistry;

/// Wire the store, channels, agent and skills described by `config`.
pub fn build_state(config: &GatewayConfig) -> anyhow::Result<AppState> {
    let store = MemoryStore::from_signed(config.store.capacity).context("creating event store")?;
    let channels = build_channels(&config.channels);
    let agent = build_agent(&config.agent).context("creating agent client")?;
    let skills = SkillRegistry::scan(&config.skills.dirs).filter(&config.skills.allowlist);

    info!(
        "gateway configured (capacity={}, channels={}, skills={}, agent={})",
        config.store.capacity,
        channels.len(),
        skills.len(),
        if config.agent.url.is_empty() { "stub" } else { config.agent.url.as_str() }
    );

    Ok(AppState::new(Arc::new(store), channels, agent, skills))
}

/// Serve the gateway on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// `run`: load config, start the server and block until SIGINT or SIGTERM.
pub async fn run_gateway(config_path: &Path) -> anyhow::Result<()> {
    let config = GatewayConfig::load(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    init_logging(&config.logging);

    let state = Arc::new(build_state(&config)?);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("server starting (addr={})", addr);

    serve(listener, state, shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl+c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to listen for SIGTERM: {}", err);
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
    info!("shutting down gracefully");
}
