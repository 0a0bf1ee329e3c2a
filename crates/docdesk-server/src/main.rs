//! `docdesk` server entry point.
//!
//! Loads configuration, builds the REST gateway, then starts the Axum HTTP
//! server with graceful shutdown. A background worker drops idle browser
//! sessions and is cancelled on shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, info};

use docdesk_server::config::ServerConfig;
use docdesk_server::routes;
use docdesk_server::state::AppState;
use docdesk_store::{DocumentGateway, RestGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(
        project = %config.gateway.project_id,
        firestore = %config.gateway.firestore_url,
        "docdesk starting"
    );

    let gateway: Arc<dyn DocumentGateway> = Arc::new(
        RestGateway::new(config.gateway.clone()).context("failed to build document gateway")?,
    );
    let state = Arc::new(AppState::new(gateway));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper_handle = {
        let state = Arc::clone(&state);
        let mut rx = shutdown_rx.clone();
        let max_idle = config.session_idle;
        let interval_secs = config.session_sweep_interval_secs;
        tokio::spawn(async move {
            session_sweeper(state, &mut rx, max_idle, interval_secs).await;
        })
    };

    let app = routes::router(Arc::clone(&state));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "docdesk listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    info!("waiting for background workers to stop");
    let _ = tokio::time::timeout(Duration::from_secs(10), sweeper_handle).await;

    info!("docdesk stopped");
    Ok(())
}

/// Periodically drop browser sessions that have been idle too long.
async fn session_sweeper(
    state: Arc<AppState>,
    shutdown: &mut watch::Receiver<bool>,
    max_idle: Duration,
    interval_secs: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    info!(interval_secs, idle_secs = max_idle.as_secs(), "session sweeper started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let dropped = state.sessions.prune_idle(max_idle).await;
                if dropped > 0 {
                    let live = state.sessions.len().await;
                    info!(dropped, live, "idle sessions dropped");
                } else {
                    debug!("no idle sessions");
                }
            }
            _ = shutdown.changed() => {
                info!("session sweeper shutting down");
                return;
            }
        }
    }
}

async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
