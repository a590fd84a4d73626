//! Polymarket CLOB client
//!
//! Root crate for integration tests and benchmarks. Use the member crates
//! directly:
//!
//! - `clob-core`: decimal rounding, EIP-712 hashing, order amounts and signing
//! - `clob-auth`: L1 (`ClobAuth`) and L2 (HMAC) request authentication
//! - `clob-client`: order facade and authenticated REST client

pub use clob_auth as auth;
pub use clob_client as client;
pub use clob_core as core;
