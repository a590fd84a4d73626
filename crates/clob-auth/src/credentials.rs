//! API credentials for L2 (HMAC) authentication.

use serde::{Deserialize, Serialize};

use clob_core::{Error, Result};

/// API credentials for authenticated CLOB requests.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyCreds {
    #[serde(rename = "apiKey", alias = "key")]
    pub key: String,
    /// URL-safe base64 HMAC secret.
    pub secret: String,
    pub passphrase: String,
}

impl std::fmt::Debug for ApiKeyCreds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCreds")
            .field("key", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}

impl ApiKeyCreds {
    pub fn new(
        key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Load from `POLY_API_KEY`, `POLY_API_SECRET` and `POLY_API_PASSPHRASE`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let var = |name: &str| {
            std::env::var(name).map_err(|_| Error::Config {
                message: format!("{} environment variable not set", name),
            })
        };
        Ok(Self {
            key: var("POLY_API_KEY")?,
            secret: var("POLY_API_SECRET")?,
            passphrase: var("POLY_API_PASSPHRASE")?,
        })
    }

    /// False if any field is empty.
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty() && !self.passphrase.is_empty()
    }
}
