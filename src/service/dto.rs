//! Request/response DTOs for the HTTP surface.

use serde::{Deserialize, Serialize};

use crate::order::types::{OrderType, Side};
use crate::pipeline::{NormalizedOrder, PlacedOrder};
use crate::types::Decimal;

/// `POST /place_order` body; mirrors the trading-intent fields.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub market_id: String,
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub client_tag: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub ok: bool,
    pub dry_run: bool,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub normalized: NormalizedOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_tag: Option<String>,
}

impl PlaceOrderResponse {
    #[must_use]
    pub fn new(placed: PlacedOrder, client_tag: Option<String>) -> Self {
        Self {
            ok: placed.result.accepted,
            dry_run: placed.result.dry_run,
            accepted: placed.result.accepted,
            order_id: placed.result.order_id,
            status: placed.result.status,
            error: placed.result.error,
            normalized: placed.normalized,
            client_tag,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrderIdQuery {
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub dry_run: bool,
}
