//! Fixed-point currency handling.
//!
//! Rent columns are `decimal(10, 2)`: at most ten significant digits, two
//! of them after the decimal point. Some backends hand decimals back with a
//! different scale (SQLite stores them as REAL), so every value leaving the
//! repositories goes through [`normalize`].

use rust_decimal::Decimal;
use thiserror::Error;

pub const MAX_DIGITS: u32 = 10;
pub const DECIMAL_PLACES: u32 = 2;

/// Digits allowed before the decimal point.
pub const MAX_WHOLE_DIGITS: u32 = MAX_DIGITS - DECIMAL_PLACES;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Ensure that there are no more than {} decimal places.", DECIMAL_PLACES)]
    TooManyDecimalPlaces,
    #[error(
        "Ensure that there are no more than {} digits before the decimal point.",
        MAX_WHOLE_DIGITS
    )]
    TooManyWholeDigits,
}

/// Rounds to two places and pins the scale, so `1500` renders as `1500.00`.
pub fn normalize(value: Decimal) -> Decimal {
    let mut value = value.round_dp(DECIMAL_PLACES);
    value.rescale(DECIMAL_PLACES);
    value
}

/// Checks a value fits `decimal(10, 2)`.
///
/// Trailing zeros are insignificant: `12.500` passes, `12.505` does not.
pub fn check(value: &Decimal) -> Result<(), MoneyError> {
    let significant = value.normalize();

    if significant.scale() > DECIMAL_PLACES {
        return Err(MoneyError::TooManyDecimalPlaces);
    }

    if whole_digits(&significant) > MAX_WHOLE_DIGITS {
        return Err(MoneyError::TooManyWholeDigits);
    }

    Ok(())
}

fn whole_digits(value: &Decimal) -> u32 {
    let whole = value.trunc().abs().to_string();
    whole.trim_start_matches('0').len() as u32
}
