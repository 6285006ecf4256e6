use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatepass_api::config::ServerConfig;
use gatepass_api::context::{DataContext, RefreshOutcome};
use gatepass_api::router::build_app_router;
use gatepass_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gatepass_api=debug,gatepass_db=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let store = gatepass_db::connect(&config.storage)
        .await
        .expect("Failed to open storage backend");
    store
        .health_check()
        .await
        .expect("Storage health check failed");
    tracing::info!(backend = store.kind().name(), "Storage backend ready");

    // --- Data context ---
    let context = Arc::new(DataContext::new(store));
    match context.refresh().await {
        RefreshOutcome::Applied { .. } => tracing::info!("Initial data loaded"),
        other => tracing::warn!(?other, "Initial data load did not apply"),
    }

    // --- App state ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let state = AppState {
        context,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // The signal flips `signalled`; from then on in-flight requests get the
    // configured grace period to drain.
    let (signalled_tx, mut signalled) = tokio::sync::watch::channel(false);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = signalled_tx.send(true);
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            report_exit(result);
            return;
        }
        _ = signalled.changed() => {}
    }

    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(result) => report_exit(result),
        Err(_) => tracing::warn!(
            grace_secs = shutdown_timeout.as_secs(),
            "Shutdown grace period elapsed, dropping open connections"
        ),
    }
    tracing::info!("Graceful shutdown complete");
}

fn report_exit(result: Result<std::io::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Server error"),
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
