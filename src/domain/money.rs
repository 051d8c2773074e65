//! Currency units and price conversion.
//!
//! The remote daemon speaks in hastings (the smallest currency unit) and
//! prices storage per byte per block. Operators think in siacoins per
//! terabyte per month. Everything crossing that boundary goes through here.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

/// Smallest currency units in one coin.
pub const HASTINGS_PER_SIACOIN: u128 = 10u128.pow(24);

/// Bytes in one (decimal) terabyte.
pub const BYTES_PER_TERABYTE: u128 = 1_000_000_000_000;

/// Blocks produced in one month at the target block time.
pub const BLOCKS_PER_MONTH: u128 = 4320;

/// An amount in the smallest currency unit.
///
/// Deserializes from the decimal strings the daemon uses for currency as
/// well as from plain JSON integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hastings(u128);

impl Hastings {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u128 {
        self.0
    }

    /// Exact conversion from a coin amount.
    ///
    /// Returns `None` for negative amounts or amounts that overflow.
    #[must_use]
    pub fn from_siacoins(amount: Decimal) -> Option<Self> {
        if amount.is_sign_negative() {
            return None;
        }
        let whole = amount.trunc().to_u128()?;
        let unit = Decimal::from_i128_with_scale(HASTINGS_PER_SIACOIN as i128, 0);
        let fraction = (amount.fract() * unit).trunc().to_u128()?;
        whole
            .checked_mul(HASTINGS_PER_SIACOIN)
            .and_then(|h| h.checked_add(fraction))
            .map(Self)
    }

    /// Conversion to coins, exact up to `Decimal`'s 28 significant digits.
    #[must_use]
    pub fn to_siacoins(self) -> Decimal {
        let whole = self.0 / HASTINGS_PER_SIACOIN;
        let fraction = self.0 % HASTINGS_PER_SIACOIN;
        let whole = u64::try_from(whole).map_or(Decimal::MAX, Decimal::from);
        (whole + Decimal::from_i128_with_scale(fraction as i128, 24)).normalize()
    }
}

impl fmt::Display for Hastings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Hastings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text
                .trim()
                .parse::<u128>()
                .map(Self)
                .map_err(|e| de::Error::custom(format!("invalid currency '{text}': {e}"))),
            Raw::Number(n) => Ok(Self(u128::from(n))),
        }
    }
}

const TINY_PER_BIG: f64 = (BYTES_PER_TERABYTE * BLOCKS_PER_MONTH) as f64;

/// Hastings per byte per block to coins per terabyte per month.
#[must_use]
pub fn tiny_to_big(tiny: Hastings) -> f64 {
    tiny.0 as f64 * TINY_PER_BIG / HASTINGS_PER_SIACOIN as f64
}

/// Coins per terabyte per month to hastings per byte per block.
///
/// Negative prices clamp to zero.
#[must_use]
pub fn big_to_tiny(big: f64) -> Hastings {
    let tiny = big * HASTINGS_PER_SIACOIN as f64 / TINY_PER_BIG;
    Hastings(tiny.max(0.0).round() as u128)
}
