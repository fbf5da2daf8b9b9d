//! Shared primitive aliases.

pub use alloy::primitives::{Address, U256};
pub use rust_decimal::Decimal;

/// EVM chain id used for EIP-712 domain separation.
pub type ChainId = u64;
