// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use trip_gateway::{
    api::router, config::AppConfig, logging::init_logging, revocation_pruner::RevocationPruner,
    state::AppState,
};

#[tokio::main]
async fn main() {
    // Configuration errors are fatal before anything is served
    let config = AppConfig::from_env().expect("Failed to load configuration");
    init_logging(config.log_format);

    let state = AppState::from_config(&config);

    let shutdown = CancellationToken::new();
    let pruner = tokio::spawn(
        RevocationPruner::new(state.revocations.clone())
            .with_interval(config.prune_interval)
            .run(shutdown.clone()),
    );

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");

    info!(
        addr = %config.bind_addr,
        upload_dir = %config.upload_dir.display(),
        "Trip gateway listening (docs at /docs)"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server failed");
    }

    shutdown.cancel();
    if let Err(e) = pruner.await {
        error!(error = %e, "Revocation pruner task failed");
    }
    info!("Trip gateway stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
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
    info!("Shutdown signal received");
}
