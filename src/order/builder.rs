//! Intent validation and normalization into signable orders.

use chrono::Utc;
use rand::Rng as _;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::ToPrimitive as _;
use rust_decimal_macros::dec;

use crate::Result;
use crate::error::Error;
use crate::order::intent::TradingIntent;
use crate::order::types::{CanonicalOrder, Order, OrderType, Side, SignatureType, TickSize};
use crate::types::{Address, Decimal, U256};

/// USDC and CTF tokens both use 6 on-chain decimals.
const USDC_DECIMALS: u32 = 6;
/// Share sizes quantize to two decimal places.
const LOT_SIZE_SCALE: u32 = 2;
/// The exchange rejects orders below $1 notional; failing early saves a
/// signed submission that can only bounce.
const MIN_NOTIONAL: Decimal = dec!(1);
/// Hard cap on GTD lifetimes.
const MAX_GTD_HORIZON_SECS: u64 = 86_400;

/// Order-placing identity, resolved once from configuration.
#[derive(Clone, Copy, Debug)]
pub struct AccountContext {
    /// Address the order settles against (proxy wallet when configured).
    pub maker: Address,
    /// Address holding signing authority.
    pub signer: Address,
    pub signature_type: SignatureType,
}

impl AccountContext {
    /// maker=proxy, signer=wallet under proxy schemes; maker=signer=wallet
    /// for plain EOA signing.
    pub fn resolve(
        signer: Address,
        proxy: Option<Address>,
        signature_type: SignatureType,
    ) -> Result<Self> {
        let maker = match (signature_type.requires_proxy(), proxy) {
            (true, Some(proxy)) if proxy != Address::ZERO => proxy,
            (true, Some(_)) => {
                return Err(Error::validation(
                    "proxy signature types require a non-zero funder address",
                ));
            }
            (true, None) => {
                return Err(Error::validation(
                    "proxy signature types require a funder address",
                ));
            }
            (false, Some(_)) => {
                return Err(Error::validation(
                    "cannot use a funder address with an Eoa signature type",
                ));
            }
            (false, None) => signer,
        };
        Ok(Self {
            maker,
            signer,
            signature_type,
        })
    }
}

/// Tunable order-shaping policy.
#[derive(Clone, Copy, Debug)]
pub struct OrderPolicy {
    pub tick_size: TickSize,
    pub fee_rate_bps: u32,
    /// Sign against the neg-risk exchange contract.
    pub neg_risk: bool,
    /// Expiration horizon for GTD orders, seconds.
    pub gtd_horizon_secs: u64,
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self {
            tick_size: TickSize::default(),
            fee_rate_bps: 0,
            neg_risk: false,
            gtd_horizon_secs: 3_600,
        }
    }
}

/// Normalizes trading intents into canonical, signable orders.
#[derive(Clone, Debug)]
pub struct OrderBuilder {
    account: AccountContext,
    policy: OrderPolicy,
}

impl OrderBuilder {
    #[must_use]
    pub const fn new(account: AccountContext, policy: OrderPolicy) -> Self {
        Self { account, policy }
    }

    /// Validates, quantizes, and encodes an intent.
    pub fn build(&self, intent: &TradingIntent) -> Result<CanonicalOrder> {
        intent.validate()?;
        let token_id = intent.token_id()?;

        let tick = self.policy.tick_size.as_decimal();
        let price = quantize(intent.price, tick.scale());
        let size = quantize(intent.size, LOT_SIZE_SCALE);

        if size.is_zero() {
            return Err(Error::precision(format!(
                "size {} quantizes to zero at lot scale {LOT_SIZE_SCALE}",
                intent.size
            )));
        }
        if price < tick || price > Decimal::ONE - tick {
            return Err(Error::precision(format!(
                "price {} quantizes outside the ({tick}, {}) grid",
                intent.price,
                Decimal::ONE - tick
            )));
        }

        let notional = match intent.side {
            Side::Buy => price * size,
            Side::Sell => (Decimal::ONE - price) * size,
        };
        if notional < MIN_NOTIONAL {
            return Err(Error::validation(format!(
                "order notional ${notional} is below the ${MIN_NOTIONAL} minimum"
            )));
        }

        // BUY gives USDC (maker) for shares (taker); SELL is the mirror.
        let (taker_amount, maker_amount) = match intent.side {
            Side::Buy => (
                size,
                (size * price).trunc_with_scale(tick.scale() + LOT_SIZE_SCALE),
            ),
            Side::Sell => (
                (size * price).trunc_with_scale(tick.scale() + LOT_SIZE_SCALE),
                size,
            ),
        };

        let order = Order {
            salt: U256::from(generate_salt()),
            maker: self.account.maker,
            signer: self.account.signer,
            taker: Address::ZERO,
            tokenId: token_id,
            makerAmount: U256::from(to_fixed_u128(maker_amount)?),
            takerAmount: U256::from(to_fixed_u128(taker_amount)?),
            expiration: U256::from(self.expiration_for(intent)?),
            nonce: U256::ZERO,
            feeRateBps: U256::from(self.policy.fee_rate_bps),
            side: intent.side as u8,
            signatureType: self.account.signature_type as u8,
        };

        Ok(CanonicalOrder {
            order,
            order_type: intent.order_type,
            price,
            size,
            neg_risk: self.policy.neg_risk,
        })
    }

    fn expiration_for(&self, intent: &TradingIntent) -> Result<u64> {
        if intent.order_type != OrderType::Gtd {
            return Ok(0);
        }
        let horizon = self.policy.gtd_horizon_secs.min(MAX_GTD_HORIZON_SECS);
        let expires = Utc::now() + chrono::Duration::seconds(horizon as i64);
        u64::try_from(expires.timestamp())
            .map_err(|_| Error::validation("expiration precedes the unix epoch"))
    }
}

/// Round-half-even onto a decimal grid. Idempotent: quantizing an
/// already-quantized value is a no-op.
pub(crate) fn quantize(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
}

/// Fixed-point integer encoding at 6 decimals.
fn to_fixed_u128(amount: Decimal) -> Result<u128> {
    if amount.is_sign_negative() {
        return Err(Error::validation(format!(
            "amount cannot be negative: {amount}"
        )));
    }
    (amount * Decimal::from(10_u64.pow(USDC_DECIMALS)))
        .trunc()
        .to_u128()
        .ok_or_else(|| {
            Error::validation(format!(
                "unable to represent amount as a fixed-point integer: {amount}"
            ))
        })
}

/// Fresh per-order salt. Masked to `2^53 - 1` because the backend parses
/// salts as IEEE-754 doubles.
fn generate_salt() -> u64 {
    rand::rng().random::<u64>() & ((1 << 53) - 1)
}
