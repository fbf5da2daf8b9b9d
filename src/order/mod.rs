//! Order construction and signing.
//!
//! [`intent`] holds the operator-facing inputs, [`builder`] normalizes
//! them into the exact EIP-712 struct the exchange verifies, and
//! [`signer`] produces the signature over that struct.

pub mod builder;
pub mod intent;
pub mod signer;
pub mod types;

pub use builder::{AccountContext, OrderBuilder, OrderPolicy};
pub use intent::TradingIntent;
pub use signer::OrderSigner;
pub use types::{CanonicalOrder, Order, OrderType, Side, SignatureType, SignedOrder, TickSize};
