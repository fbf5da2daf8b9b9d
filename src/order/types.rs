//! CLOB order types and wire encoding.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_with::{DisplayFromStr, serde_as};

use crate::Result;
use crate::error::Error;
use crate::types::{Decimal, U256};

alloy::sol! {
    /// CTF exchange order; the struct that is EIP-712 signed and whose
    /// exact field values appear in the wire payload.
    #[derive(Debug)]
    struct Order {
        uint256 salt;
        address maker;
        address signer;
        address taker;
        uint256 tokenId;
        uint256 makerAmount;
        uint256 takerAmount;
        uint256 expiration;
        uint256 nonce;
        uint256 feeRateBps;
        uint8 side;
        uint8 signatureType;
    }
}

/// Order side. The numeric values are bound into the signed struct.
#[non_exhaustive]
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[repr(u8)]
pub enum Side {
    #[serde(alias = "buy")]
    Buy = 0,
    #[serde(alias = "sell")]
    Sell = 1,
}

/// Time-in-force. Only GTD orders carry a non-zero expiration.
#[non_exhaustive]
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum OrderType {
    /// Good til cancelled.
    #[default]
    Gtc,
    /// Good til the order's expiration time.
    Gtd,
    /// Fill or kill.
    Fok,
    /// Fill and kill (immediate or cancel).
    Fak,
}

/// Account scheme authorizing an order.
///
/// Each variant differs only in how maker/signer addresses are resolved
/// and in the tag bound into the signed struct; the digest and key are
/// the same.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum SignatureType {
    /// Direct wallet signature; maker and signer are the wallet itself.
    Eoa = 0,
    /// Polymarket (Magic/email) proxy wallet funds the order.
    Proxy = 1,
    /// Gnosis-Safe-style browser wallet proxy funds the order.
    GnosisSafe = 2,
}

impl SignatureType {
    /// Proxy schemes settle against a separate funder address.
    #[must_use]
    pub const fn requires_proxy(self) -> bool {
        !matches!(self, SignatureType::Eoa)
    }
}

impl FromStr for SignatureType {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" | "eoa" => Ok(SignatureType::Eoa),
            "1" | "proxy" => Ok(SignatureType::Proxy),
            "2" | "gnosis" | "gnosis_safe" | "gnosissafe" | "safe" => Ok(SignatureType::GnosisSafe),
            other => Err(Error::config(format!(
                "invalid SIGNATURE_TYPE `{other}`; expected one of: eoa|proxy|gnosis"
            ))),
        }
    }
}

/// Price grid of a market.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TickSize {
    Tenth,
    #[default]
    Hundredth,
    Thousandth,
    TenThousandth,
}

impl TickSize {
    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        match self {
            TickSize::Tenth => rust_decimal_macros::dec!(0.1),
            TickSize::Hundredth => rust_decimal_macros::dec!(0.01),
            TickSize::Thousandth => rust_decimal_macros::dec!(0.001),
            TickSize::TenThousandth => rust_decimal_macros::dec!(0.0001),
        }
    }
}

impl FromStr for TickSize {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim() {
            "0.1" => Ok(TickSize::Tenth),
            "0.01" => Ok(TickSize::Hundredth),
            "0.001" => Ok(TickSize::Thousandth),
            "0.0001" => Ok(TickSize::TenThousandth),
            other => Err(Error::config(format!("invalid tick size `{other}`"))),
        }
    }
}

/// Fully normalized order, ready to sign.
///
/// `price`/`size` are already quantized; `order` embeds the exact field
/// values the signature will cover. Any mutation after signing
/// invalidates the signature, so the struct is never exposed mutably.
#[derive(Clone, Debug)]
pub struct CanonicalOrder {
    pub order: Order,
    pub order_type: OrderType,
    pub price: Decimal,
    pub size: Decimal,
    pub neg_risk: bool,
}

/// Signed order plus the envelope metadata `POST /order` expects.
#[derive(Clone, Debug)]
pub struct SignedOrder {
    pub order: Order,
    pub signature: alloy::primitives::Signature,
    pub order_type: OrderType,
}

impl SignedOrder {
    #[must_use]
    pub fn signature_hex(&self) -> String {
        alloy::hex::encode_prefixed(self.signature.as_bytes())
    }

    /// Wire payload for `POST /order`. `owner` is the submitting API key.
    pub fn wire_payload(&self, owner: &str) -> Result<PostOrderPayload> {
        let salt = u64::try_from(self.order.salt)
            .map_err(|_| Error::validation("order salt exceeds the wire range"))?;
        Ok(PostOrderPayload {
            order: WireOrder {
                salt,
                maker: self.order.maker.to_string(),
                signer: self.order.signer.to_string(),
                taker: self.order.taker.to_string(),
                token_id: self.order.tokenId,
                maker_amount: self.order.makerAmount,
                taker_amount: self.order.takerAmount,
                expiration: self.order.expiration,
                nonce: self.order.nonce,
                fee_rate_bps: self.order.feeRateBps,
                side: if self.order.side == 0 { "BUY" } else { "SELL" },
                signature_type: self.order.signatureType,
                signature: self.signature_hex(),
            },
            owner: owner.to_owned(),
            order_type: self.order_type,
        })
    }
}

/// JSON envelope carried by `POST /order`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOrderPayload {
    pub order: WireOrder,
    pub owner: String,
    pub order_type: OrderType,
}

/// Signed struct fields in the exchange's JSON encoding: amounts as
/// decimal strings, salt as a number, side as `BUY`/`SELL`.
#[serde_as]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    pub salt: u64,
    pub maker: String,
    pub signer: String,
    pub taker: String,
    #[serde_as(as = "DisplayFromStr")]
    pub token_id: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub maker_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub taker_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub expiration: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub nonce: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub fee_rate_bps: U256,
    pub side: &'static str,
    pub signature_type: u8,
    pub signature: String,
}
