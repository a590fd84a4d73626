//! User-facing order requests.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::order::TickSize;
use crate::signing::OrderSide;

/// Time-in-force of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Good-til-cancelled limit order.
    #[default]
    Gtc,
    /// Fill-or-kill - must be fully filled or cancelled.
    Fok,
    /// Good-til-date, expires at the order's expiration.
    Gtd,
    /// Fill-and-kill - fills what it can immediately, cancels the rest.
    Fak,
}

impl OrderType {
    /// Orders that never rest on the book.
    pub fn is_immediate(&self) -> bool {
        matches!(self, OrderType::Fok | OrderType::Fak)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Gtc => "GTC",
            OrderType::Fok => "FOK",
            OrderType::Gtd => "GTD",
            OrderType::Fak => "FAK",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A limit order: buy or sell `size` shares at `price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOrder {
    pub token_id: String,
    pub price: Decimal,
    pub size: Decimal,
    pub side: OrderSide,
    pub fee_rate_bps: Option<u64>,
    pub nonce: Option<u64>,
    /// Unix seconds; `None` or 0 means no expiration.
    pub expiration: Option<u64>,
    pub taker: Option<Address>,
}

impl UserOrder {
    pub fn new(token_id: impl Into<String>, price: Decimal, size: Decimal, side: OrderSide) -> Self {
        Self {
            token_id: token_id.into(),
            price,
            size,
            side,
            fee_rate_bps: None,
            nonce: None,
            expiration: None,
            taker: None,
        }
    }

    pub fn with_fee_rate_bps(mut self, fee_rate_bps: u64) -> Self {
        self.fee_rate_bps = Some(fee_rate_bps);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_expiration(mut self, expiration: u64) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_taker(mut self, taker: Address) -> Self {
        self.taker = Some(taker);
        self
    }
}

/// A market order.
///
/// For BUY, `amount` is collateral to spend; for SELL, shares to sell.
/// `price` is the worst acceptable price and is discovered from the book
/// when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMarketOrder {
    pub token_id: String,
    pub amount: Decimal,
    pub side: OrderSide,
    pub price: Option<Decimal>,
    pub fee_rate_bps: Option<u64>,
    pub nonce: Option<u64>,
    pub taker: Option<Address>,
    pub order_type: Option<OrderType>,
}

impl UserMarketOrder {
    pub fn new(token_id: impl Into<String>, amount: Decimal, side: OrderSide) -> Self {
        Self {
            token_id: token_id.into(),
            amount,
            side,
            price: None,
            fee_rate_bps: None,
            nonce: None,
            taker: None,
            order_type: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_fee_rate_bps(mut self, fee_rate_bps: u64) -> Self {
        self.fee_rate_bps = Some(fee_rate_bps);
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_taker(mut self, taker: Address) -> Self {
        self.taker = Some(taker);
        self
    }

    pub fn with_order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// Order type used for price discovery, FOK when unset.
    pub fn order_type_or_default(&self) -> OrderType {
        self.order_type.unwrap_or(OrderType::Fok)
    }
}

/// Either kind of order, consumed by a single codec entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderIntent {
    Limit(UserOrder),
    Market(UserMarketOrder),
}

impl OrderIntent {
    pub fn token_id(&self) -> &str {
        match self {
            OrderIntent::Limit(order) => &order.token_id,
            OrderIntent::Market(order) => &order.token_id,
        }
    }

    pub fn side(&self) -> OrderSide {
        match self {
            OrderIntent::Limit(order) => order.side,
            OrderIntent::Market(order) => order.side,
        }
    }
}

impl From<UserOrder> for OrderIntent {
    fn from(order: UserOrder) -> Self {
        OrderIntent::Limit(order)
    }
}

impl From<UserMarketOrder> for OrderIntent {
    fn from(order: UserMarketOrder) -> Self {
        OrderIntent::Market(order)
    }
}

/// Fully resolved market parameters for encoding one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOrderOptions {
    pub tick_size: TickSize,
    pub neg_risk: bool,
}

impl CreateOrderOptions {
    pub fn new(tick_size: TickSize, neg_risk: bool) -> Self {
        Self {
            tick_size,
            neg_risk,
        }
    }
}

/// Caller overrides; anything left `None` is looked up from the market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialCreateOrderOptions {
    pub tick_size: Option<TickSize>,
    pub neg_risk: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_wire_names() {
        assert_eq!(serde_json::to_string(&OrderType::Gtc).unwrap(), "\"GTC\"");
        assert_eq!(serde_json::to_string(&OrderType::Fak).unwrap(), "\"FAK\"");
        let parsed: OrderType = serde_json::from_str("\"GTD\"").unwrap();
        assert_eq!(parsed, OrderType::Gtd);
        assert_eq!(OrderType::Fok.to_string(), "FOK");
    }

    #[test]
    fn test_immediate_order_types() {
        assert!(OrderType::Fok.is_immediate());
        assert!(OrderType::Fak.is_immediate());
        assert!(!OrderType::Gtc.is_immediate());
        assert!(!OrderType::Gtd.is_immediate());
    }

    #[test]
    fn test_market_order_defaults_to_fok() {
        let order = UserMarketOrder::new("1", Decimal::from(10), OrderSide::Buy);
        assert_eq!(order.order_type_or_default(), OrderType::Fok);
        let order = order.with_order_type(OrderType::Fak);
        assert_eq!(order.order_type_or_default(), OrderType::Fak);
    }

    #[test]
    fn test_intent_accessors() {
        let intent: OrderIntent =
            UserOrder::new("42", Decimal::new(5, 1), Decimal::from(10), OrderSide::Sell).into();
        assert_eq!(intent.token_id(), "42");
        assert_eq!(intent.side(), OrderSide::Sell);
    }
}
