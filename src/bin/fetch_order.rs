//! One-shot fetch of an existing order's current state.
//!
//! Authenticated with the env `API_KEY`/`API_SECRET`/`API_PASSPHRASE`
//! triple; performs no mutation. Prints the order as JSON on stdout.

use polymarket_order_service::Result;
use polymarket_order_service::config::Settings;
use polymarket_order_service::error::Error;
use polymarket_order_service::pipeline::OrderPipeline;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run().await {
        error!(error = %err, "fetch failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let order_id = std::env::args()
        .nth(1)
        .ok_or_else(|| Error::validation("usage: fetch_order <order-id>"))?;

    let settings = Settings::from_env()?;
    let pipeline = OrderPipeline::from_settings(&settings).await?;
    let order = pipeline.client().order_status(&order_id).await?;

    println!("{}", serde_json::to_string_pretty(&order)?);
    Ok(())
}
