//! Trading intents: the operator-facing order inputs.

use std::str::FromStr as _;

use bon::Builder;

use crate::Result;
use crate::error::Error;
use crate::order::types::{OrderType, Side};
use crate::types::{Decimal, U256};

/// A request to trade: market, side, price, size.
///
/// Immutable once built; validation of shape and range lives here, grid
/// fit is the builder's concern.
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct TradingIntent {
    /// CLOB token id of the outcome being traded, decimal or 0x-hex.
    #[builder(into)]
    pub market_id: String,
    pub side: Side,
    /// Probability price, strictly between 0 and 1.
    pub price: Decimal,
    /// Share count.
    pub size: Decimal,
    #[builder(default)]
    pub order_type: OrderType,
}

impl TradingIntent {
    /// Shape/range checks; everything here is user fixable.
    pub fn validate(&self) -> Result<()> {
        if self.market_id.trim().is_empty() {
            return Err(Error::validation("market_id must not be empty"));
        }
        if self.price <= Decimal::ZERO || self.price >= Decimal::ONE {
            return Err(Error::validation(format!(
                "price {} must be strictly between 0 and 1",
                self.price
            )));
        }
        if self.size <= Decimal::ZERO {
            return Err(Error::validation(format!(
                "size {} must be positive",
                self.size
            )));
        }
        Ok(())
    }

    /// Token id as the exchange encodes it.
    pub(crate) fn token_id(&self) -> Result<U256> {
        let raw = self.market_id.trim();
        U256::from_str(raw).map_err(|_| {
            Error::validation(format!("market_id `{raw}` is not a valid token id"))
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::error::Kind;

    fn intent(price: Decimal, size: Decimal) -> TradingIntent {
        TradingIntent::builder()
            .market_id("1234567890")
            .side(Side::Buy)
            .price(price)
            .size(size)
            .build()
    }

    #[test]
    fn accepts_a_plain_buy() {
        let intent = intent(dec!(0.55), dec!(10));
        intent.validate().expect("intent must be valid");
        assert_eq!(intent.order_type, OrderType::Gtc);
        assert_eq!(intent.token_id().expect("token id"), U256::from(1_234_567_890_u64));
    }

    #[test]
    fn parses_hex_token_ids() {
        let intent = TradingIntent::builder()
            .market_id("0xABC")
            .side(Side::Sell)
            .price(dec!(0.5))
            .size(dec!(5))
            .build();
        assert_eq!(intent.token_id().expect("token id"), U256::from(0xABC_u64));
    }

    #[test]
    fn rejects_out_of_range_prices() {
        for price in [dec!(1.2), dec!(1), dec!(0), dec!(-0.3)] {
            let err = intent(price, dec!(10)).validate().expect_err("must fail");
            assert_eq!(err.kind(), Kind::Validation);
        }
    }

    #[test]
    fn rejects_non_positive_sizes() {
        for size in [dec!(0), dec!(-1)] {
            let err = intent(dec!(0.5), size).validate().expect_err("must fail");
            assert_eq!(err.kind(), Kind::Validation);
        }
    }

    #[test]
    fn rejects_bad_market_ids() {
        let blank = TradingIntent::builder()
            .market_id("  ")
            .side(Side::Buy)
            .price(dec!(0.5))
            .size(dec!(10))
            .build();
        assert_eq!(blank.validate().expect_err("must fail").kind(), Kind::Validation);

        let garbage = TradingIntent::builder()
            .market_id("not-a-token")
            .side(Side::Buy)
            .price(dec!(0.5))
            .size(dec!(10))
            .build();
        assert_eq!(garbage.token_id().expect_err("must fail").kind(), Kind::Validation);
    }
}
