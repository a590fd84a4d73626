//! Order facade: resolves market parameters, validates the price and hands
//! a fully specified intent to the codec.

use rust_decimal::Decimal;
use tracing::debug;

use clob_core::order::{ensure_price_valid, resolve_market_price, OrderCodec, TickSize};
use clob_core::signing::{OrderSide, SignedOrder};
use clob_core::types::{
    CreateOrderOptions, OrderIntent, OrderType, PartialCreateOrderOptions, UserMarketOrder,
    UserOrder,
};
use clob_core::{Error, Result};

use crate::market_data::MarketData;

/// Fetch the book for `token_id` and price a market order of `amount` on it.
pub async fn book_market_price(
    market: &dyn MarketData,
    token_id: &str,
    side: OrderSide,
    amount: Decimal,
    order_type: OrderType,
) -> Result<Decimal> {
    let book = market.order_book(token_id).await?;
    resolve_market_price(&book, side, amount, order_type)
}

pub struct OrderFacade<'a> {
    codec: &'a OrderCodec,
    market: &'a dyn MarketData,
}

impl<'a> OrderFacade<'a> {
    pub fn new(codec: &'a OrderCodec, market: &'a dyn MarketData) -> Self {
        Self { codec, market }
    }

    /// The market minimum, or `requested` if it is not finer than the minimum.
    pub async fn resolve_tick_size(
        &self,
        token_id: &str,
        requested: Option<TickSize>,
    ) -> Result<TickSize> {
        let minimum = self.market.tick_size(token_id).await?;
        match requested {
            Some(tick) if tick.is_smaller_than(minimum) => Err(Error::InvalidTickSize {
                message: format!(
                    "invalid tick size ({}), minimum for the market is {}",
                    tick, minimum
                ),
            }),
            Some(tick) => Ok(tick),
            None => Ok(minimum),
        }
    }

    /// The market fee rate. A user value that disagrees with a nonzero
    /// market rate is rejected.
    pub async fn resolve_fee_rate(&self, token_id: &str, user_fee_rate: Option<u64>) -> Result<u64> {
        let market_rate = self.market.fee_rate_bps(token_id).await?;
        if let Some(provided) = user_fee_rate {
            if market_rate > 0 && provided != market_rate {
                return Err(Error::InvalidFeeRate {
                    provided,
                    required: market_rate,
                });
            }
        }
        Ok(market_rate)
    }

    pub async fn resolve_neg_risk(&self, token_id: &str, requested: Option<bool>) -> Result<bool> {
        match requested {
            Some(neg_risk) => Ok(neg_risk),
            None => self.market.neg_risk(token_id).await,
        }
    }

    /// Price a market order of `amount` against the current book.
    pub async fn calculate_market_price(
        &self,
        token_id: &str,
        side: OrderSide,
        amount: Decimal,
        order_type: OrderType,
    ) -> Result<Decimal> {
        book_market_price(self.market, token_id, side, amount, order_type).await
    }

    pub async fn create_order(
        &self,
        mut order: UserOrder,
        options: Option<PartialCreateOrderOptions>,
    ) -> Result<SignedOrder> {
        let options = options.unwrap_or_default();
        let tick_size = self.resolve_tick_size(&order.token_id, options.tick_size).await?;
        order.fee_rate_bps = Some(self.resolve_fee_rate(&order.token_id, order.fee_rate_bps).await?);

        ensure_price_valid(order.price, tick_size)?;

        let neg_risk = self.resolve_neg_risk(&order.token_id, options.neg_risk).await?;
        self.codec.build(
            &OrderIntent::Limit(order),
            &CreateOrderOptions::new(tick_size, neg_risk),
        )
    }

    pub async fn create_market_order(
        &self,
        mut order: UserMarketOrder,
        options: Option<PartialCreateOrderOptions>,
    ) -> Result<SignedOrder> {
        let options = options.unwrap_or_default();
        let tick_size = self.resolve_tick_size(&order.token_id, options.tick_size).await?;
        order.fee_rate_bps = Some(self.resolve_fee_rate(&order.token_id, order.fee_rate_bps).await?);

        let price = match order.price {
            Some(price) => price,
            None => {
                let price = self
                    .calculate_market_price(
                        &order.token_id,
                        order.side,
                        order.amount,
                        order.order_type_or_default(),
                    )
                    .await?;
                debug!(token_id = %order.token_id, %price, "Resolved market order price from book");
                price
            }
        };
        ensure_price_valid(price, tick_size)?;
        order.price = Some(price);

        let neg_risk = self.resolve_neg_risk(&order.token_id, options.neg_risk).await?;
        self.codec.build(
            &OrderIntent::Market(order),
            &CreateOrderOptions::new(tick_size, neg_risk),
        )
    }
}
