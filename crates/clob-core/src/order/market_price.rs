//! Market price discovery by walking an order book side.
//!
//! Levels are stored worst to best, so the walk starts at the end of the
//! slice and moves toward the front until enough depth has accumulated.

use rust_decimal::Decimal;
use tracing::debug;

use crate::signing::OrderSide;
use crate::types::{OrderBookSummary, OrderType, PriceLevel};
use crate::{Error, Result};

/// Price at which `amount` of collateral can be spent against `asks`.
pub fn calculate_buy_market_price(
    asks: &[PriceLevel],
    amount: Decimal,
    order_type: OrderType,
) -> Result<Decimal> {
    walk_levels(asks, amount, order_type, PriceLevel::notional)
}

/// Price at which `amount` shares can be sold into `bids`.
pub fn calculate_sell_market_price(
    bids: &[PriceLevel],
    amount: Decimal,
    order_type: OrderType,
) -> Result<Decimal> {
    walk_levels(bids, amount, order_type, |level| Ok(level.size))
}

/// Pick the side of `book` a market order of `side` consumes and walk it.
pub fn resolve_market_price(
    book: &OrderBookSummary,
    side: OrderSide,
    amount: Decimal,
    order_type: OrderType,
) -> Result<Decimal> {
    match side {
        OrderSide::Buy => calculate_buy_market_price(&book.asks, amount, order_type),
        OrderSide::Sell => calculate_sell_market_price(&book.bids, amount, order_type),
    }
}

fn walk_levels(
    levels: &[PriceLevel],
    amount: Decimal,
    order_type: OrderType,
    depth: impl Fn(&PriceLevel) -> Result<Decimal>,
) -> Result<Decimal> {
    let worst = levels.first().ok_or(Error::NoMatch)?;

    let mut sum = Decimal::ZERO;
    for level in levels.iter().rev() {
        let step = depth(level)?;
        sum = sum
            .checked_add(step)
            .ok_or_else(|| Error::malformed(format!("{} + {}", sum, step), "overflow"))?;
        if sum >= amount {
            return Ok(level.price);
        }
    }

    if order_type == OrderType::Fok {
        debug!(%amount, available = %sum, "Insufficient depth for FOK order");
        return Err(Error::NoMatch);
    }
    Ok(worst.price)
}
