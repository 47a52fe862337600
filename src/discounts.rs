//! Discounts
//!
//! Percentage arithmetic shared by the percentage-based promotions.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// The fraction held by a percentage, e.g. `0.05` for 5%.
pub fn percent_value(percent: &Percentage) -> Decimal {
    (*percent) * Decimal::ONE
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// Rounds half away from zero.
///
/// # Errors
///
/// Returns `DiscountError::PercentConversion` if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    percent_value(percent)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Reduce a price by a percentage of itself.
///
/// # Errors
///
/// Returns a `DiscountError` if the percentage amount cannot be represented.
pub fn reduce_by_percent<'a>(
    price: &Money<'a, Currency>,
    percent: &Percentage,
) -> Result<Money<'a, Currency>, DiscountError> {
    let minor = price.to_minor_units();
    let discount = percent_of_minor(percent, minor)?;

    let reduced = minor
        .checked_sub(discount)
        .ok_or(DiscountError::PercentConversion)?;

    Ok(Money::from_minor(reduced, price.currency()))
}
