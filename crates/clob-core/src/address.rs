//! Address parsing and canonical rendering.

use alloy_primitives::Address;

use crate::{Error, Result};

/// The zero address, used as the taker of public orders.
pub const ZERO_ADDRESS: Address = Address::ZERO;

/// Canonical lowercase `0x`-prefixed hex form.
pub fn to_lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Parse a hex address, with or without `0x`, in any letter case.
pub fn parse_address(raw: &str) -> Result<Address> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(digits).map_err(|e| Error::InvalidArgument(format!(
        "invalid address '{}': {}",
        raw, e
    )))?;
    if bytes.len() != 20 {
        return Err(Error::InvalidArgument(format!(
            "invalid address '{}': expected 20 bytes, got {}",
            raw,
            bytes.len()
        )));
    }
    Ok(Address::from_slice(&bytes))
}
