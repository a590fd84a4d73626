//! Polymarket CLOB core library.
//!
//! Exact decimal arithmetic, EIP-712 hashing and signing, and construction
//! of signed exchange orders. Nothing in this crate performs I/O.

pub mod address;
pub mod clock;
pub mod config;
pub mod decimal;
pub mod eip712;
pub mod error;
pub mod order;
pub mod signing;
pub mod types;

pub use error::{Error, Result};
