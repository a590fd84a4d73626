//! Order book types as returned by the CLOB API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single price level in the order book.
///
/// Prices and sizes travel as decimal strings and are parsed exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub size: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    /// Collateral value of the level (`price * size`).
    pub fn notional(&self) -> Result<Decimal> {
        self.price.checked_mul(self.size).ok_or_else(|| {
            Error::malformed(format!("{} * {}", self.price, self.size), "overflow")
        })
    }
}

/// Order book snapshot for one outcome token.
///
/// Both sides are ordered worst to best: the last bid is the highest and the
/// last ask is the lowest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSummary {
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
}

impl OrderBookSummary {
    /// Returns the best bid price (highest buy order).
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.last().map(|l| l.price)
    }

    /// Returns the best ask price (lowest sell order).
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.last().map(|l| l.price)
    }
}
