//! CLOB submission client.
//!
//! Owns every network interaction: order submission with dry-run
//! short-circuiting, the authenticated read/cancel operations, and L2
//! credential bootstrap. Retries are sequential with bounded exponential
//! backoff so a flaky exchange never sees duplicate live submissions.

pub mod response;

use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use chrono::Utc;
use reqwest::{Client as HttpClient, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{info, warn};
use url::Url;

use crate::auth::{self, Credentials};
use crate::config::HttpPolicy;
use crate::error::{Error, Kind};
use crate::order::types::SignedOrder;
use crate::types::{Address, ChainId};
use crate::{Result, Timestamp};

use response::{CancelResponse, OrderState, PostOrderResponse, SubmissionResult};

/// Whether a timed-out request may have reached the matching engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Idempotency {
    /// Safe to replay blindly (reads, cancels).
    Safe,
    /// A timeout after send leaves the outcome unknown.
    Mutating,
}

struct L2Auth {
    address: Address,
    credentials: Credentials,
}

/// HTTP client for the CLOB endpoint.
pub struct SubmissionClient {
    host: Url,
    http: HttpClient,
    auth: Option<L2Auth>,
    policy: HttpPolicy,
}

impl SubmissionClient {
    pub fn new(host: Url, policy: HttpPolicy) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(policy.timeout_ms))
            .connect_timeout(Duration::from_millis(policy.connect_timeout_ms))
            .build()?;
        Ok(Self {
            host,
            http,
            auth: None,
            policy,
        })
    }

    /// Attaches L2 credentials; `address` is the EOA they were issued to.
    #[must_use]
    pub fn with_auth(mut self, address: Address, credentials: Credentials) -> Self {
        self.auth = Some(L2Auth {
            address,
            credentials,
        });
        self
    }

    /// Submits a signed order, or simulates the submission in dry-run
    /// mode. Dry runs never touch the network.
    pub async fn submit(&self, signed: &SignedOrder, dry_run: bool) -> Result<SubmissionResult> {
        if dry_run {
            info!(order_type = %signed.order_type, "dry run: skipping exchange submission");
            return Ok(SubmissionResult::simulated());
        }

        let l2 = self.l2()?;
        let payload = signed.wire_payload(l2.credentials.key())?;
        let request = self
            .http
            .request(Method::POST, self.endpoint("order")?)
            .json(&payload)
            .build()?;
        let request = self.authenticate(request)?;

        let response = self.execute_with_retry(request, Idempotency::Mutating).await?;
        let status = response.status();
        if status.is_success() {
            let posted: PostOrderResponse = response.json().await?;
            Ok(SubmissionResult::from_exchange(posted))
        } else {
            let body = truncate(&response.text().await.unwrap_or_default());
            warn!(status = status.as_u16(), body = %body, "exchange rejected order");
            Ok(SubmissionResult::rejected(status.as_u16(), body))
        }
    }

    /// Current state of a single order.
    pub async fn order_status(&self, order_id: &str) -> Result<OrderState> {
        let request = self
            .http
            .request(Method::GET, self.endpoint(&format!("data/order/{order_id}"))?)
            .build()?;
        let request = self.authenticate(request)?;
        let response = self.execute_with_retry(request, Idempotency::Safe).await?;
        Self::expect_json(response).await
    }

    /// Open orders for the authenticated account.
    pub async fn open_orders(&self) -> Result<Vec<OrderState>> {
        let request = self
            .http
            .request(Method::GET, self.endpoint("data/orders")?)
            .build()?;
        let request = self.authenticate(request)?;
        let response = self.execute_with_retry(request, Idempotency::Safe).await?;
        Self::expect_json(response).await
    }

    /// Cancels one order. Cancelling an already-dead order is harmless,
    /// so the request replays freely.
    pub async fn cancel(&self, order_id: &str) -> Result<CancelResponse> {
        let request = self
            .http
            .request(Method::DELETE, self.endpoint("order")?)
            .json(&serde_json::json!({ "orderID": order_id }))
            .build()?;
        let request = self.authenticate(request)?;
        let response = self.execute_with_retry(request, Idempotency::Safe).await?;
        Self::expect_json(response).await
    }

    /// Creates L2 credentials under L1 auth, falling back to derivation
    /// when the key pair already exists.
    pub async fn create_or_derive_api_key(
        &self,
        signer: &PrivateKeySigner,
        chain_id: ChainId,
        nonce: Option<u32>,
    ) -> Result<Credentials> {
        let created = self
            .l1_request(Method::POST, "auth/api-key", signer, chain_id, nonce)
            .await;
        match created {
            Ok(credentials) => Ok(credentials),
            Err(err) if err.kind() == Kind::Status => {
                self.l1_request(Method::GET, "auth/derive-api-key", signer, chain_id, nonce)
                    .await
            }
            Err(err) => Err(err),
        }
    }

    async fn l1_request(
        &self,
        method: Method,
        path: &str,
        signer: &PrivateKeySigner,
        chain_id: ChainId,
        nonce: Option<u32>,
    ) -> Result<Credentials> {
        let mut request = self.http.request(method, self.endpoint(path)?).build()?;
        let headers = auth::l1::create_headers(signer, chain_id, now(), nonce).await?;
        request.headers_mut().extend(headers);
        let response = self.execute_with_retry(request, Idempotency::Safe).await?;
        Self::expect_json(response).await
    }

    fn l2(&self) -> Result<&L2Auth> {
        self.auth
            .as_ref()
            .ok_or_else(|| Error::signing("API credentials are not configured"))
    }

    fn authenticate(&self, mut request: Request) -> Result<Request> {
        let l2 = self.l2()?;
        let headers = auth::l2::create_headers(l2.address, &l2.credentials, &request, now())?;
        request.headers_mut().extend(headers);
        Ok(request)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.host.join(path)?)
    }

    async fn expect_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = truncate(&response.text().await.unwrap_or_default());
            Err(Error::status(status.as_u16(), message))
        }
    }

    /// Sequential bounded-backoff retry loop.
    ///
    /// Retries connect failures, 429 and 5xx. Other statuses return to
    /// the caller. A timeout on a mutating request surfaces as
    /// `UnknownOutcome`: the order may have reached the matching engine,
    /// and a blind retry could double-place it.
    async fn execute_with_retry(
        &self,
        request: Request,
        idempotency: Idempotency,
    ) -> Result<reqwest::Response> {
        let max_retries = self.policy.max_retries;
        let mut attempt: u32 = 0;
        loop {
            let this_try = request
                .try_clone()
                .ok_or_else(|| Error::submission("request body cannot be replayed"))?;
            let reason = match self.http.execute(this_try).await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        format!("status {}", status.as_u16())
                    } else {
                        return Ok(response);
                    }
                }
                Err(err) if err.is_connect() => format!("connect error: {err}"),
                Err(err) if err.is_timeout() => {
                    if idempotency == Idempotency::Mutating {
                        return Err(Error::unknown_outcome(
                            "request timed out after send; the order may or may not have been placed",
                        ));
                    }
                    format!("timeout: {err}")
                }
                Err(err) => return Err(Error::from(err)),
            };

            if attempt >= max_retries {
                return Err(Error::submission(format!(
                    "exchange unreachable after {} attempts: {reason}",
                    attempt + 1
                )));
            }
            let backoff_ms = self.policy.base_backoff_ms.saturating_mul(1 << attempt);
            attempt += 1;
            warn!(attempt, max_retries, backoff_ms, reason = %reason, "retrying CLOB request");
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
        }
    }
}

fn now() -> Timestamp {
    Utc::now().timestamp()
}

fn truncate(text: &str) -> String {
    text.chars().take(300).collect()
}
