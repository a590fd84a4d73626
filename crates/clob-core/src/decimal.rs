//! Exact fixed-precision decimal helpers.
//!
//! Every rounding operation is explicit and directional, and none of them
//! touch a value that already fits in the requested number of places.
//! [`to_integer_string`] is the `parseUnits` step that turns a pre-rounded
//! decimal into the integer representation used on-chain.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{Error, Result};

/// Number of significant fractional digits once trailing zeros are trimmed.
pub fn decimal_places(value: Decimal) -> u32 {
    value.normalize().scale()
}

/// Round half away from zero to `decimals` places.
pub fn round_half_up(value: Decimal, decimals: u32) -> Decimal {
    round_with(value, decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncate toward zero to `decimals` places.
pub fn round_down(value: Decimal, decimals: u32) -> Decimal {
    round_with(value, decimals, RoundingStrategy::ToZero)
}

/// Ceiling to `decimals` places.
pub fn round_up(value: Decimal, decimals: u32) -> Decimal {
    round_with(value, decimals, RoundingStrategy::ToPositiveInfinity)
}

fn round_with(value: Decimal, decimals: u32, strategy: RoundingStrategy) -> Decimal {
    if decimal_places(value) <= decimals {
        return value;
    }
    value.round_dp_with_strategy(decimals, strategy)
}

/// Shift the decimal point of `value` right by `scale` digits and return the
/// resulting integer as a string with no leading zeros.
///
/// The input must already be rounded: a value with more than `scale`
/// significant fractional digits is rejected rather than rounded again.
///
/// ```
/// use clob_core::decimal::to_integer_string;
///
/// assert_eq!(to_integer_string("1.500000", 6).unwrap(), "1500000");
/// assert_eq!(to_integer_string("0.0001", 4).unwrap(), "1");
/// ```
pub fn to_integer_string(value: &str, scale: u32) -> Result<String> {
    let trimmed = value.trim();
    let plain = if trimmed.contains(['e', 'E']) {
        resolve_exponent(trimmed, scale)?
    } else {
        trimmed.to_string()
    };

    let unsigned = plain.strip_prefix('+').unwrap_or(&plain);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(Error::malformed(value, "not a decimal numeral"));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(Error::malformed(value, "not a decimal numeral"));
    }

    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > scale as usize {
        return Err(Error::malformed(
            value,
            format!("more than {} fractional digits", scale),
        ));
    }

    let mut digits = String::with_capacity(whole.len() + scale as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(scale as usize - fraction.len()));

    let stripped = digits.trim_start_matches('0');
    Ok(if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    })
}

fn resolve_exponent(value: &str, scale: u32) -> Result<String> {
    let parsed = Decimal::from_scientific(value)
        .map_err(|e| Error::malformed(value, format!("unresolvable exponent: {}", e)))?;
    if decimal_places(parsed) > scale {
        return Err(Error::malformed(
            value,
            format!("exponent does not resolve to {} fractional digits", scale),
        ));
    }
    Ok(parsed.normalize().to_string())
}
