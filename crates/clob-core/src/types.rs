//! Order book and order request types.

pub mod market;
pub mod order;

pub use market::*;
pub use order::*;
