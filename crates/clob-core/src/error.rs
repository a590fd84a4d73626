//! Error types for CLOB authentication and order encoding.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication unavailable: {message}")]
    AuthenticationUnavailable { message: String },

    #[error("invalid price ({price}), min: {min} - max: {max}")]
    InvalidPrice {
        price: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("Invalid tick size: {message}")]
    InvalidTickSize { message: String },

    #[error("invalid user provided fee rate: {provided}, fee rate for the market must be {required}")]
    InvalidFeeRate { provided: u64, required: u64 },

    #[error("no match")]
    NoMatch,

    #[error("Malformed decimal '{value}': {reason}")]
    MalformedDecimal { value: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Signing error: {message}")]
    Signing { message: String },

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transport error: {message}")]
    Transport { message: String, status: Option<u16> },
}

impl Error {
    /// Shorthand for a [`Error::MalformedDecimal`].
    pub fn malformed(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedDecimal {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Whether a caller may reasonably retry with different parameters or later.
    ///
    /// Signing and encoding failures reproduce identically for identical input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::NoMatch | Error::Transport { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_price_message_names_bounds() {
        let err = Error::InvalidPrice {
            price: Decimal::new(995, 3),
            min: Decimal::new(1, 2),
            max: Decimal::new(99, 2),
        };
        assert_eq!(err.to_string(), "invalid price (0.995), min: 0.01 - max: 0.99");
    }

    #[test]
    fn test_retryable_taxonomy() {
        assert!(Error::NoMatch.is_retryable());
        assert!(Error::Transport {
            message: "timeout".to_string(),
            status: None
        }
        .is_retryable());
        assert!(!Error::malformed("1e", "bad exponent").is_retryable());
        assert!(!Error::AuthenticationUnavailable {
            message: "no key".to_string()
        }
        .is_retryable());
    }
}
