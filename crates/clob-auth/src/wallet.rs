//! The trading wallet: the private key behind L1 auth and order signatures.

use alloy_primitives::Address;
use anyhow::{bail, Context, Result};
use clob_core::address::to_lower_hex;
use clob_core::signing::OrderSigner;

/// Environment variable holding the hex private key.
pub const WALLET_PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";

/// Wallet whose key signs `ClobAuth` messages and exchange orders.
#[derive(Clone)]
pub struct TradingWallet {
    signer: OrderSigner,
}

impl TradingWallet {
    /// Read the key from `WALLET_PRIVATE_KEY`, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let key = std::env::var(WALLET_PRIVATE_KEY_ENV)
            .with_context(|| format!("{} is not set", WALLET_PRIVATE_KEY_ENV))?;
        Self::from_private_key(&key)
    }

    /// Accepts 64 hex characters with or without a `0x` prefix.
    pub fn from_private_key(key: &str) -> Result<Self> {
        if key.trim().trim_start_matches("0x").is_empty() {
            bail!("Private key is empty");
        }
        let signer = OrderSigner::from_private_key(key)
            .context("Private key must be 32 bytes of hex")?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Lowercase `0x` address as sent in `POLY_ADDRESS`.
    pub fn address_string(&self) -> String {
        to_lower_hex(&self.address())
    }

    pub fn order_signer(&self) -> OrderSigner {
        self.signer.clone()
    }
}

impl std::fmt::Debug for TradingWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingWallet")
            .field("address", &self.address_string())
            .finish_non_exhaustive()
    }
}
