//! Signing module for Polymarket CLOB orders.
//!
//! EIP-712 domains, the `Order` struct and the ECDSA signer shared by order
//! construction and L1 authentication.
//!
//! ```text
//! OrderIntent ─► OrderCodec ─► OrderData ─► OrderSigner ─► SignedOrder
//!                                                │
//!                        ClobAuth (clob-auth) ───┘
//! ```

pub mod domain;
pub mod order_types;
pub mod signer;

pub use domain::{
    clob_auth_domain, exchange_domain, OrderSide, SignatureType, CLOB_AUTH_DOMAIN_NAME,
    EXCHANGE_DOMAIN_NAME,
};

pub use order_types::{OrderData, SignedOrder, WireOrder, ORDER_TYPE};

pub use signer::OrderSigner;
