//! Polymarket CLOB order service.
//!
//! The crate turns a trading intent (market, side, price, size) into a
//! signed, exchange-compliant order and submits it to the CLOB, either
//! for real or as a dry run:
//!
//! - build + validate + quantize intents into canonical orders
//! - sign orders as EIP-712 typed data (EOA or proxy-wallet schemes)
//! - submit signed orders with L2 auth headers, bounded retries, and
//!   explicit dry-run short-circuiting
//!
//! The [`pipeline`] module composes the three stages; [`service`] exposes
//! them over HTTP, and `src/bin/fetch_order.rs` provides a one-shot
//! authenticated order lookup.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod guard;
pub mod order;
pub mod pipeline;
pub mod service;
pub mod types;

use phf::phf_map;

pub use crate::error::{Error, Kind};
use crate::types::{Address, ChainId};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Unix timestamp in seconds, as used by the CLOB auth headers.
pub type Timestamp = i64;

/// Polygon mainnet, the only chain the CLOB settles on.
pub const POLYGON: ChainId = 137;

/// Exchange contracts for a single chain.
#[derive(Clone, Copy, Debug)]
pub struct ChainContracts {
    pub exchange: Address,
    pub neg_risk_exchange: Address,
}

impl ChainContracts {
    /// Verifying contract for the EIP-712 order domain.
    #[must_use]
    pub const fn verifying_contract(&self, neg_risk: bool) -> Address {
        if neg_risk {
            self.neg_risk_exchange
        } else {
            self.exchange
        }
    }
}

static CONTRACTS: phf::Map<u64, ChainContracts> = phf_map! {
    137u64 => ChainContracts {
        exchange: alloy::primitives::address!("0x4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E"),
        neg_risk_exchange: alloy::primitives::address!("0xC5d563A36AE78145C45a50134d48A1215220f80a"),
    },
};

/// Exchange contracts for `chain_id`, if the chain is supported.
#[must_use]
pub fn contract_config(chain_id: ChainId) -> Option<&'static ChainContracts> {
    CONTRACTS.get(&chain_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_contracts_are_known() {
        let contracts = contract_config(POLYGON).expect("polygon must be supported");
        assert_ne!(contracts.exchange, contracts.neg_risk_exchange);
        assert_ne!(
            contracts.verifying_contract(false),
            contracts.verifying_contract(true)
        );
    }

    #[test]
    fn unknown_chain_has_no_contracts() {
        assert!(contract_config(1).is_none());
    }
}
