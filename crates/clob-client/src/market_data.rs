//! Per-token market parameters consumed by order construction.

use async_trait::async_trait;

use clob_core::order::TickSize;
use clob_core::types::OrderBookSummary;
use clob_core::Result;

/// Source of market parameters for one outcome token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Minimum tick size of the market.
    async fn tick_size(&self, token_id: &str) -> Result<TickSize>;

    /// Whether the market settles through the neg-risk exchange.
    async fn neg_risk(&self, token_id: &str) -> Result<bool>;

    /// Fee rate the market requires, in basis points (0 when none).
    async fn fee_rate_bps(&self, token_id: &str) -> Result<u64>;

    async fn order_book(&self, token_id: &str) -> Result<OrderBookSummary>;
}
