//! EIP-712 domains and order enums for the Polymarket CLOB.
//!
//! Orders are signed against the CTF Exchange domain (which names a
//! verifying contract); wallet authentication uses the ClobAuth domain,
//! which has none.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::eip712::Eip712Domain;
use crate::{Error, Result};

/// Domain name of the CTF Exchange (standard and neg-risk share it).
pub const EXCHANGE_DOMAIN_NAME: &str = "Polymarket CTF Exchange";

/// Domain version of the CTF Exchange.
pub const EXCHANGE_DOMAIN_VERSION: &str = "1";

/// Domain name used for L1 (wallet) authentication.
pub const CLOB_AUTH_DOMAIN_NAME: &str = "ClobAuthDomain";

/// Domain version used for L1 (wallet) authentication.
pub const CLOB_AUTH_DOMAIN_VERSION: &str = "1";

/// Domain for orders verified by `exchange` on `chain_id`.
pub fn exchange_domain(chain_id: u64, exchange: Address) -> Eip712Domain {
    Eip712Domain::new(EXCHANGE_DOMAIN_NAME, EXCHANGE_DOMAIN_VERSION, chain_id)
        .with_verifying_contract(exchange)
}

/// Domain for ClobAuth messages on `chain_id`.
pub fn clob_auth_domain(chain_id: u64) -> Eip712Domain {
    Eip712Domain::new(CLOB_AUTH_DOMAIN_NAME, CLOB_AUTH_DOMAIN_VERSION, chain_id)
}

/// Order side (buy/sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy = 0,
    Sell = 1,
}

impl OrderSide {
    /// Get the numeric value for signing.
    pub fn as_u8(&self) -> u8 {
        match self {
            OrderSide::Buy => 0,
            OrderSide::Sell => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl TryFrom<u8> for OrderSide {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(OrderSide::Buy),
            1 => Ok(OrderSide::Sell),
            other => Err(Error::InvalidArgument(format!("unknown order side {}", other))),
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature type for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureType {
    /// EOA signature (most common); maker and signer are the same wallet.
    #[default]
    Eoa = 0,
    /// Polymarket proxy wallet funded by the signer.
    PolyProxy = 1,
    /// Gnosis Safe proxy funded by the signer.
    PolyGnosisSafe = 2,
}

impl SignatureType {
    /// Get the numeric value for signing.
    pub fn as_u8(&self) -> u8 {
        match self {
            SignatureType::Eoa => 0,
            SignatureType::PolyProxy => 1,
            SignatureType::PolyGnosisSafe => 2,
        }
    }
}

impl TryFrom<u8> for SignatureType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(SignatureType::Eoa),
            1 => Ok(SignatureType::PolyProxy),
            2 => Ok(SignatureType::PolyGnosisSafe),
            other => Err(Error::Config {
                message: format!("unknown signature type {}", other),
            }),
        }
    }
}
