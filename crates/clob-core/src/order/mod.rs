//! Order construction: rounding policy, raw amounts, market price discovery,
//! signing and the submission payload.

pub mod amounts;
pub mod codec;
pub mod market_price;
pub mod payload;
pub mod rounding;

pub use amounts::{limit_order_amounts, market_order_amounts, RawAmounts};
pub use codec::{parse_token_id, FixedSalt, OrderCodec, RandomSalt, SaltGenerator};
pub use market_price::{
    calculate_buy_market_price, calculate_sell_market_price, resolve_market_price,
};
pub use payload::PostOrderRequest;
pub use rounding::{ensure_price_valid, price_valid, RoundConfig, TickSize};
