//! Authentication header sets.

pub const POLY_ADDRESS: &str = "POLY_ADDRESS";
pub const POLY_SIGNATURE: &str = "POLY_SIGNATURE";
pub const POLY_TIMESTAMP: &str = "POLY_TIMESTAMP";
pub const POLY_NONCE: &str = "POLY_NONCE";
pub const POLY_API_KEY: &str = "POLY_API_KEY";
pub const POLY_PASSPHRASE: &str = "POLY_PASSPHRASE";

/// Wallet-level (L1) headers, used to create or derive API keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L1Headers {
    pub address: String,
    pub signature: String,
    pub timestamp: String,
    pub nonce: String,
}

impl L1Headers {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (POLY_ADDRESS, self.address.clone()),
            (POLY_SIGNATURE, self.signature.clone()),
            (POLY_TIMESTAMP, self.timestamp.clone()),
            (POLY_NONCE, self.nonce.clone()),
        ]
    }
}

/// API-key-level (L2) headers.
#[derive(Clone, PartialEq, Eq)]
pub struct L2Headers {
    pub address: String,
    pub signature: String,
    pub timestamp: String,
    pub api_key: String,
    pub passphrase: String,
}

impl L2Headers {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            (POLY_ADDRESS, self.address.clone()),
            (POLY_SIGNATURE, self.signature.clone()),
            (POLY_TIMESTAMP, self.timestamp.clone()),
            (POLY_API_KEY, self.api_key.clone()),
            (POLY_PASSPHRASE, self.passphrase.clone()),
        ]
    }
}

impl std::fmt::Debug for L2Headers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("L2Headers")
            .field("address", &self.address)
            .field("timestamp", &self.timestamp)
            .field("signature", &"[REDACTED]")
            .field("api_key", &"[REDACTED]")
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}
