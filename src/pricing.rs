//! Prices

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::Item;

/// Errors that can occur while calculating total price.
#[derive(Debug, Error, PartialEq)]
pub enum TotalPriceError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the total base price of a list of items
///
/// # Errors
///
/// - [`TotalPriceError::Money`]: an item's currency differs from `currency`.
pub fn total_price<'a>(
    items: &[Item<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    sum_prices(items, currency, Item::base_price)
}

/// Calculates the total discounted price of a list of items
///
/// # Errors
///
/// - [`TotalPriceError::Money`]: an item's currency differs from `currency`.
pub fn total_discounted_price<'a>(
    items: &[Item<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    sum_prices(items, currency, Item::discount_price)
}

fn sum_prices<'a>(
    items: &[Item<'a>],
    currency: &'a Currency,
    price: for<'i> fn(&'i Item<'a>) -> &'i Money<'a, Currency>,
) -> Result<Money<'a, Currency>, TotalPriceError> {
    let total = items
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, item| {
            acc.add(*price(item))
        })?;

    Ok(total)
}
