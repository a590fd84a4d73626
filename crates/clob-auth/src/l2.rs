//! L2 authentication: HMAC-SHA256 request signatures keyed by the API secret.

use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use tracing::debug;

use clob_core::clock::Clock;
use clob_core::{Error, Result};

use crate::credentials::ApiKeyCreds;
use crate::headers::L2Headers;

type HmacSha256 = Hmac<Sha256>;

/// URL-safe alphabet, accepting secrets with or without `=` padding.
const SECRET_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Sign `timestamp ‖ method ‖ path [‖ body]`.
///
/// Returns the MAC as URL-safe base64 with padding.
pub fn build_hmac_signature(
    secret: &str,
    timestamp: u64,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> Result<String> {
    let key = SECRET_ENGINE
        .decode(secret.trim())
        .map_err(|e| Error::AuthenticationUnavailable {
            message: format!("API secret is not valid URL-safe base64: {}", e),
        })?;

    let mut mac = HmacSha256::new_from_slice(&key).map_err(|e| Error::Signing {
        message: format!("Failed to create HMAC: {}", e),
    })?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    if let Some(body) = body {
        mac.update(body.as_bytes());
    }

    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}

/// Serialize a request body exactly as it will be sent.
///
/// The signed string and the transmitted body must be byte-identical, so
/// callers sign and send the output of this function.
pub fn canonical_body<T: Serialize + ?Sized>(body: &T) -> Result<String> {
    Ok(serde_json::to_string(body)?)
}

/// Build L2 headers for a request to `path` (without query string).
pub fn create_l2_headers(
    address: &str,
    creds: Option<&ApiKeyCreds>,
    method: &str,
    path: &str,
    body: Option<&str>,
    timestamp: Option<u64>,
    clock: &dyn Clock,
) -> Result<L2Headers> {
    let creds = creds
        .filter(|creds| creds.is_complete())
        .ok_or_else(|| Error::AuthenticationUnavailable {
            message: "L2 authentication not available: API credentials required".to_string(),
        })?;
    let timestamp = timestamp.unwrap_or_else(|| clock.now_secs());

    let signature = build_hmac_signature(&creds.secret, timestamp, method, path, body)?;
    debug!(method, path, timestamp, "Created L2 headers");

    Ok(L2Headers {
        address: address.to_string(),
        signature,
        timestamp: timestamp.to_string(),
        api_key: creds.key.clone(),
        passphrase: creds.passphrase.clone(),
    })
}
