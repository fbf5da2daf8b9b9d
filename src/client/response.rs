//! Exchange response payloads and the operator-facing result.

use serde::{Deserialize, Serialize};

/// `POST /order` response body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostOrderResponse {
    pub success: bool,
    pub error_msg: String,
    #[serde(rename = "orderID")]
    pub order_id: String,
    pub status: String,
    pub transactions_hashes: Option<Vec<String>>,
}

/// Current state of an order, as the `data/order(s)` endpoints report it.
/// Unknown fields are preserved so read-through output stays faithful.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OrderState {
    pub id: String,
    pub status: String,
    pub market: String,
    pub asset_id: String,
    pub side: String,
    pub price: String,
    pub original_size: String,
    pub size_matched: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `DELETE /order` response body.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CancelResponse {
    pub canceled: Vec<String>,
    pub not_canceled: serde_json::Map<String, serde_json::Value>,
}

/// Outcome of one submission attempt. Transient; never persisted.
#[derive(Clone, Debug, Serialize)]
pub struct SubmissionResult {
    pub accepted: bool,
    pub order_id: Option<String>,
    /// Exchange-reported order status (`live`, `matched`, …).
    pub status: Option<String>,
    pub error: Option<String>,
    pub dry_run: bool,
}

impl SubmissionResult {
    /// Dry-run result: accepted, nothing sent, no order id.
    #[must_use]
    pub const fn simulated() -> Self {
        Self {
            accepted: true,
            order_id: None,
            status: None,
            error: None,
            dry_run: true,
        }
    }

    #[must_use]
    pub fn from_exchange(posted: PostOrderResponse) -> Self {
        Self {
            accepted: posted.success,
            order_id: non_empty(posted.order_id),
            status: non_empty(posted.status),
            error: non_empty(posted.error_msg),
            dry_run: false,
        }
    }

    /// 4xx rejection: user fixable, never retried.
    #[must_use]
    pub fn rejected(status: u16, message: String) -> Self {
        Self {
            accepted: false,
            order_id: None,
            status: None,
            error: Some(format!("HTTP {status}: {message}")),
            dry_run: false,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_results_are_accepted_without_an_order_id() {
        let result = SubmissionResult::simulated();
        assert!(result.accepted);
        assert!(result.dry_run);
        assert!(result.order_id.is_none());
        assert!(result.error.is_none());
    }

    #[test]
    fn exchange_response_maps_through() {
        let posted: PostOrderResponse = serde_json::from_str(
            r#"{"success":true,"errorMsg":"","orderID":"0xabc","status":"live"}"#,
        )
        .expect("must parse");
        let result = SubmissionResult::from_exchange(posted);
        assert!(result.accepted);
        assert_eq!(result.order_id.as_deref(), Some("0xabc"));
        assert_eq!(result.status.as_deref(), Some("live"));
        assert!(result.error.is_none());
        assert!(!result.dry_run);
    }

    #[test]
    fn order_state_preserves_unknown_fields() {
        let state: OrderState = serde_json::from_str(
            r#"{"id":"0xabc","status":"LIVE","outcome":"Yes","expiration":"0"}"#,
        )
        .expect("must parse");
        assert_eq!(state.id, "0xabc");
        assert_eq!(state.status, "LIVE");
        assert_eq!(
            state.extra.get("outcome").and_then(|v| v.as_str()),
            Some("Yes")
        );
    }
}
