//! HTTP surface: thin axum handlers over the pipeline.

mod dto;
mod error;
mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::config::{Settings, mask};
use crate::guard::AccessGuard;
use crate::order::types::SignatureType;
use crate::pipeline::OrderPipeline;

pub use error::ApiError;

/// Shared, immutable per-process state.
pub struct AppState {
    pub pipeline: OrderPipeline,
    pub guard: AccessGuard,
    pub info: ServiceInfo,
}

/// Non-secret configuration summary for the introspection routes.
#[derive(Clone, Debug, Serialize)]
pub struct ServiceInfo {
    pub clob_host: String,
    pub chain_id: u64,
    pub dry_run: bool,
    pub auth_required: bool,
    pub signature_type: SignatureType,
    pub has_private_key: bool,
    pub has_api_key: bool,
    pub has_proxy: bool,
    pub proxy_masked: Option<String>,
}

impl From<&Settings> for ServiceInfo {
    fn from(settings: &Settings) -> Self {
        Self {
            clob_host: settings.clob_host.to_string(),
            chain_id: settings.chain_id,
            dry_run: settings.dry_run,
            auth_required: settings.shared_secret.is_some(),
            signature_type: settings.signature_type,
            has_private_key: settings.private_key.is_some(),
            has_api_key: settings.api_key.is_some(),
            has_proxy: settings.proxy_address.is_some(),
            proxy_masked: settings
                .proxy_address
                .map(|address| mask(&address.to_string())),
        }
    }
}

/// Builds the shared state, deriving credentials when live mode needs
/// them.
pub async fn app_state(settings: &Settings) -> Result<Arc<AppState>> {
    let pipeline = OrderPipeline::from_settings(settings).await?;
    Ok(Arc::new(AppState {
        pipeline,
        guard: AccessGuard::new(settings.shared_secret.clone()),
        info: ServiceInfo::from(settings),
    }))
}

/// All routes. `/health` and `/config` are unguarded introspection;
/// everything else passes the access guard first.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::config))
        .route("/place_order", post(handlers::place_order))
        .route("/order_status", get(handlers::order_status))
        .route("/orders_open", get(handlers::orders_open))
        .route("/cancel_order", get(handlers::cancel_order))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
