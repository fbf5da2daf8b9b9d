//! Route handlers: guard first, then delegate to the pipeline.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use tracing::{info, warn};
use uuid::Uuid;

use super::AppState;
use super::dto::{HealthResponse, OrderIdQuery, PlaceOrderRequest, PlaceOrderResponse};
use super::error::ApiError;
use crate::client::response::{CancelResponse, OrderState};
use crate::order::intent::TradingIntent;
use crate::service::ServiceInfo;

const SERVICE_NAME: &str = "polymarket-order-service";

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers.get("x-api-key").and_then(|value| value.to_str().ok())
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME,
        dry_run: state.pipeline.dry_run(),
    })
}

/// `GET /config` — non-secret configuration summary.
pub async fn config(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(state.info.clone())
}

/// `POST /place_order`
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<Json<PlaceOrderResponse>, ApiError> {
    state.guard.authorize(presented_key(&headers))?;

    let request_id = Uuid::new_v4();
    let intent = TradingIntent::builder()
        .market_id(request.market_id)
        .side(request.side)
        .price(request.price)
        .size(request.size)
        .order_type(request.order_type)
        .build();

    let placed = state.pipeline.place(&intent).await.map_err(|err| {
        warn!(%request_id, error = %err, kind = err.kind().as_str(), "order placement failed");
        ApiError::from(err)
    })?;
    info!(
        %request_id,
        accepted = placed.result.accepted,
        dry_run = placed.result.dry_run,
        order_id = placed.result.order_id.as_deref().unwrap_or(""),
        "order pipeline completed"
    );
    Ok(Json(PlaceOrderResponse::new(placed, request.client_tag)))
}

/// `GET /order_status?order_id=0x…`
pub async fn order_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<OrderIdQuery>,
) -> Result<Json<OrderState>, ApiError> {
    state.guard.authorize(presented_key(&headers))?;
    let order = state.pipeline.client().order_status(&query.order_id).await?;
    Ok(Json(order))
}

/// `GET /orders_open`
pub async fn orders_open(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderState>>, ApiError> {
    state.guard.authorize(presented_key(&headers))?;
    let orders = state.pipeline.client().open_orders().await?;
    Ok(Json(orders))
}

/// `GET /cancel_order?order_id=0x…` — mutating; route shape kept from
/// the original deployment's sheet integration.
pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<OrderIdQuery>,
) -> Result<Json<CancelResponse>, ApiError> {
    state.guard.authorize(presented_key(&headers))?;
    let request_id = Uuid::new_v4();
    let canceled = state.pipeline.client().cancel(&query.order_id).await?;
    info!(%request_id, order_id = %query.order_id, canceled = canceled.canceled.len(), "cancel completed");
    Ok(Json(canceled))
}
