//! Authentication for the Polymarket CLOB.
//!
//! Two levels:
//! - **L1**: an EIP-712 `ClobAuth` signature from the trading wallet, used to
//!   create or derive API keys.
//! - **L2**: an HMAC-SHA256 signature keyed by the API secret, used for every
//!   order and account request.
//!
//! Both fail closed with `Error::AuthenticationUnavailable` when the wallet
//! or credentials they need are missing.

pub mod credentials;
pub mod headers;
pub mod l1;
pub mod l2;
pub mod wallet;

pub use credentials::ApiKeyCreds;
pub use headers::{L1Headers, L2Headers};
pub use l1::{build_clob_auth_signature, create_l1_headers, CLOB_AUTH_MESSAGE, CLOB_AUTH_TYPE};
pub use l2::{build_hmac_signature, canonical_body, create_l2_headers};
pub use wallet::TradingWallet;
