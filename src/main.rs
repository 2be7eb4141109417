use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use game_webhook_gateway::{
    config::Config,
    constants::server::WEBHOOK_PATH,
    router::build_router,
    startup::{init_tracing, initialize_app, install_metrics, seeded_ledger},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Loads .env before reading the environment
    let mut config = Config::from_env()?;
    init_tracing(&config);

    info!(
        environment = %config.environment,
        "Starting game webhook gateway"
    );

    let metrics_handle = install_metrics()?;
    let ledger = seeded_ledger(&config)?;
    // The seed is only needed once
    config.ledger_seed.clear();

    let mut app_state = initialize_app(&config, Arc::new(ledger))?;
    app_state.metrics_handle = Some(metrics_handle);

    let app = build_router(app_state);

    let addr = config.bind_address();
    info!("🚀 Webhook gateway listening on {}", addr);
    info!("   POST {}", WEBHOOK_PATH);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
