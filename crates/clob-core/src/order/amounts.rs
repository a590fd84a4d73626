//! Conversion of user price/size into raw maker and taker amounts.
//!
//! BUY orders give collateral (maker) for shares (taker); SELL orders give
//! shares for collateral. The share leg is truncated to the size precision
//! and the collateral leg is derived from it.

use rust_decimal::Decimal;

use super::rounding::RoundConfig;
use crate::decimal::{decimal_places, round_down, round_half_up, round_up};
use crate::signing::OrderSide;
use crate::{Error, Result};

/// Decimal maker/taker amounts before scaling to token units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAmounts {
    pub side: OrderSide,
    pub maker: Decimal,
    pub taker: Decimal,
}

/// Raw amounts for a limit order.
pub fn limit_order_amounts(
    side: OrderSide,
    size: Decimal,
    price: Decimal,
    config: RoundConfig,
) -> Result<RawAmounts> {
    let raw_price = round_half_up(price, config.price);
    let shares = round_down(size, config.size);
    let collateral = fit_amount(checked_mul(shares, raw_price)?, config.amount);

    Ok(match side {
        OrderSide::Buy => RawAmounts {
            side,
            maker: collateral,
            taker: shares,
        },
        OrderSide::Sell => RawAmounts {
            side,
            maker: shares,
            taker: collateral,
        },
    })
}

/// Raw amounts for a market order.
///
/// For BUY, `amount` is collateral to spend; for SELL, shares to sell.
pub fn market_order_amounts(
    side: OrderSide,
    amount: Decimal,
    price: Decimal,
    config: RoundConfig,
) -> Result<RawAmounts> {
    let raw_price = round_down(price, config.price);
    let maker = round_down(amount, config.size);

    let taker = match side {
        OrderSide::Buy => maker.checked_div(raw_price).ok_or_else(|| {
            Error::InvalidArgument(format!("cannot divide {} by price {}", maker, raw_price))
        })?,
        OrderSide::Sell => checked_mul(maker, raw_price)?,
    };

    Ok(RawAmounts {
        side,
        maker,
        taker: fit_amount(taker, config.amount),
    })
}

/// Bring `value` within `places` decimals: ceil at `places + 4` first, then
/// truncate if that still leaves too many digits.
fn fit_amount(value: Decimal, places: u32) -> Decimal {
    if decimal_places(value) <= places {
        return value;
    }
    let value = round_up(value, places + 4);
    if decimal_places(value) > places {
        round_down(value, places)
    } else {
        value
    }
}

fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| Error::malformed(format!("{} * {}", a, b), "overflow"))
}
