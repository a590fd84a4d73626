//! REST client for the Polymarket CLOB.
//!
//! [`ClobClient`] manages API keys, caches per-token market parameters and
//! builds, signs and submits orders. All I/O goes through an
//! [`HttpTransport`], so every request can be inspected in tests.

pub mod client;
pub mod endpoints;
pub mod facade;
pub mod market_data;
pub mod transport;

pub use client::{
    AssetType, BalanceAllowance, CancelOrdersResponse, ClobClient, LastTradePrice, MarketsPage,
    OrderQuery, PostOrderResponse, PostOrdersArgs,
};
pub use facade::OrderFacade;
pub use market_data::MarketData;
pub use transport::{ApiRequest, HttpMethod, HttpTransport, ReqwestTransport};
