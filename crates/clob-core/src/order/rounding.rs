//! Tick sizes and their rounding rules.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Decimal places allowed for price, size and amount under one tick size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    pub price: u32,
    pub size: u32,
    pub amount: u32,
}

/// Minimum price increment of a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSize {
    /// 0.1
    Tenth,
    /// 0.01
    Hundredth,
    /// 0.001
    Thousandth,
    /// 0.0001
    TenThousandth,
}

impl TickSize {
    pub const ALL: [TickSize; 4] = [
        TickSize::Tenth,
        TickSize::Hundredth,
        TickSize::Thousandth,
        TickSize::TenThousandth,
    ];

    pub fn as_decimal(&self) -> Decimal {
        match self {
            TickSize::Tenth => Decimal::new(1, 1),
            TickSize::Hundredth => Decimal::new(1, 2),
            TickSize::Thousandth => Decimal::new(1, 3),
            TickSize::TenThousandth => Decimal::new(1, 4),
        }
    }

    pub fn round_config(&self) -> RoundConfig {
        match self {
            TickSize::Tenth => RoundConfig {
                price: 1,
                size: 2,
                amount: 3,
            },
            TickSize::Hundredth => RoundConfig {
                price: 2,
                size: 2,
                amount: 4,
            },
            TickSize::Thousandth => RoundConfig {
                price: 3,
                size: 2,
                amount: 5,
            },
            TickSize::TenThousandth => RoundConfig {
                price: 4,
                size: 2,
                amount: 6,
            },
        }
    }

    /// True when `self` is a finer increment than `other`.
    pub fn is_smaller_than(&self, other: TickSize) -> bool {
        self.as_decimal() < other.as_decimal()
    }

    /// Smallest valid price (one tick).
    pub fn min_price(&self) -> Decimal {
        self.as_decimal()
    }

    /// Largest valid price (one minus one tick).
    pub fn max_price(&self) -> Decimal {
        Decimal::ONE - self.as_decimal()
    }
}

impl TryFrom<Decimal> for TickSize {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        let normalized = value.normalize();
        TickSize::ALL
            .into_iter()
            .find(|tick| tick.as_decimal() == normalized)
            .ok_or_else(|| Error::InvalidTickSize {
                message: format!("unsupported tick size {}", normalized),
            })
    }
}

impl FromStr for TickSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .map_err(|_| Error::InvalidTickSize {
                message: format!("unsupported tick size '{}'", s),
            })?;
        TickSize::try_from(value)
    }
}

impl fmt::Display for TickSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

impl Serialize for TickSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Tick sizes arrive as `"0.01"` or `0.01` depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTickSize {
    Text(String),
    Number(f64),
}

impl<'de> Deserialize<'de> for TickSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = match RawTickSize::deserialize(deserializer)? {
            RawTickSize::Text(text) => text,
            RawTickSize::Number(number) => number.to_string(),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Whether `price` lies within `[tick, 1 - tick]`.
pub fn price_valid(price: Decimal, tick_size: TickSize) -> bool {
    price >= tick_size.min_price() && price <= tick_size.max_price()
}

/// [`price_valid`] as a `Result` carrying the allowed bounds.
pub fn ensure_price_valid(price: Decimal, tick_size: TickSize) -> Result<()> {
    if price_valid(price, tick_size) {
        Ok(())
    } else {
        Err(Error::InvalidPrice {
            price,
            min: tick_size.min_price(),
            max: tick_size.max_price(),
        })
    }
}
