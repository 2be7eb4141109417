//! Conversion between major currency units and integer minor units (cents).
//!
//! All arithmetic is exact decimal; binary floating point never touches an amount.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::money::MINOR_UNIT_SCALE;
use crate::error::{ApiError, Result};

/// Convert a major-unit amount to minor units, rounding half away from zero.
///
/// `100.50 -> 10050`, `0.005 -> 1`, `-0.005 -> -1`.
pub fn to_minor_units(major: Decimal) -> Result<i64> {
    let scaled = major
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(ApiError::AmountOutOfRange(major))?;

    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(ApiError::AmountOutOfRange(major))
}

/// Signed minor units to major units (`1050 -> 10.50`)
pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}

/// Unsigned wire amount to major units (`1 -> 0.01`)
pub fn unsigned_to_major_units(minor: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(minor), MINOR_UNIT_SCALE)
}
