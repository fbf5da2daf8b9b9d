//! Polymarket order service entrypoint.

use polymarket_order_service::config::Settings;
use polymarket_order_service::error::Error;
use polymarket_order_service::{Result, service};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!(error = %err, "fatal");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings = Settings::from_env()?;
    info!(
        host = %settings.clob_host,
        chain_id = settings.chain_id,
        dry_run = settings.dry_run,
        auth_required = settings.shared_secret.is_some(),
        "starting order service"
    );
    if !settings.dry_run {
        info!("DRY_RUN disabled: orders will be submitted to the exchange");
    }

    let state = service::app_state(&settings).await?;
    let router = service::create_router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .map_err(|e| Error::config(format!("cannot bind {}: {e}", settings.bind_addr)))?;
    info!(addr = %settings.bind_addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .map_err(|e| Error::config(format!("server error: {e}")))?;

    info!("order service stopped");
    Ok(())
}
