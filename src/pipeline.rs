//! The build → sign → submit pipeline.
//!
//! One pipeline per process; every execution is stateless apart from the
//! immutable identity and credentials resolved at startup, so concurrent
//! requests need no locking.

use serde::Serialize;
use tracing::info;

use crate::Result;
use crate::client::SubmissionClient;
use crate::client::response::SubmissionResult;
use crate::config::Settings;
use crate::error::Error;
use crate::order::builder::{AccountContext, OrderBuilder, OrderPolicy};
use crate::order::intent::TradingIntent;
use crate::order::signer::OrderSigner;
use crate::order::types::CanonicalOrder;
use crate::types::{Address, Decimal};

/// Signing-capable half of the pipeline; absent when no key is
/// configured, in which case order placement fails closed.
struct SigningStack {
    builder: OrderBuilder,
    signer: OrderSigner,
}

/// Composes the order builder, signer, and submission client.
pub struct OrderPipeline {
    signing: Option<SigningStack>,
    client: SubmissionClient,
    dry_run: bool,
}

/// Echo of what was actually signed, for responses and audit logs.
#[derive(Clone, Debug, Serialize)]
pub struct NormalizedOrder {
    pub market_id: String,
    pub side: String,
    pub price: Decimal,
    pub size: Decimal,
    pub order_type: String,
    pub maker: String,
    pub signer: String,
}

/// A completed pipeline run.
#[derive(Clone, Debug, Serialize)]
pub struct PlacedOrder {
    pub result: SubmissionResult,
    pub normalized: NormalizedOrder,
}

impl OrderPipeline {
    /// Builds the pipeline from immutable settings. In live mode with a
    /// key but no env credentials, L2 credentials are derived up front so
    /// per-request submissions never block on auth bootstrap.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let signing = match &settings.private_key {
            Some(key) => {
                let signer = OrderSigner::from_key(key, settings.chain_id)?;
                let account = AccountContext::resolve(
                    signer.address(),
                    settings.proxy_address,
                    settings.signature_type,
                )?;
                Some(SigningStack {
                    builder: OrderBuilder::new(account, OrderPolicy::default()),
                    signer,
                })
            }
            None => None,
        };

        let client = SubmissionClient::new(settings.clob_host.clone(), settings.http.clone())?;
        let credentials = match (settings.credentials(), &signing, settings.dry_run) {
            (Some(credentials), _, _) => Some(credentials),
            (None, Some(stack), false) => {
                info!("no API credentials configured; deriving via L1 auth");
                Some(
                    client
                        .create_or_derive_api_key(stack.signer.wallet(), settings.chain_id, None)
                        .await?,
                )
            }
            _ => None,
        };

        let client = match credentials {
            Some(credentials) => {
                let address = signing
                    .as_ref()
                    .map_or(Address::ZERO, |stack| stack.signer.address());
                client.with_auth(address, credentials)
            }
            None => client,
        };

        Ok(Self {
            signing,
            client,
            dry_run: settings.dry_run,
        })
    }

    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Read/cancel operations share the pipeline's authenticated client.
    #[must_use]
    pub const fn client(&self) -> &SubmissionClient {
        &self.client
    }

    /// Runs intent → build → sign → submit.
    pub async fn place(&self, intent: &TradingIntent) -> Result<PlacedOrder> {
        intent.validate()?;
        let stack = self
            .signing
            .as_ref()
            .ok_or_else(|| Error::signing("PRIVATE_KEY is not configured"))?;

        let canonical = stack.builder.build(intent)?;
        let signed = stack.signer.sign(&canonical).await?;
        info!(
            market_id = %intent.market_id,
            side = %intent.side,
            price = %canonical.price,
            size = %canonical.size,
            dry_run = self.dry_run,
            "submitting order"
        );
        let result = self.client.submit(&signed, self.dry_run).await?;
        Ok(PlacedOrder {
            normalized: normalized(intent, &canonical),
            result,
        })
    }
}

fn normalized(intent: &TradingIntent, canonical: &CanonicalOrder) -> NormalizedOrder {
    NormalizedOrder {
        market_id: intent.market_id.clone(),
        side: intent.side.to_string(),
        price: canonical.price,
        size: canonical.size,
        order_type: canonical.order_type.to_string(),
        maker: canonical.order.maker.to_string(),
        signer: canonical.order.signer.to_string(),
    }
}
