//! Order Value Percentage Discount
//!
//! Takes a percentage off every item once the basket's base-price subtotal is strictly above a
//! threshold. The reduction is taken from each item's current discount price, so it stacks on top
//! of promotions applied before it.

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use tracing::trace;

use crate::{
    basket::Basket,
    discounts::reduce_by_percent,
    promotions::{
        Promotion, PromotionError, PromotionKey, ensure_currency, validate_percentage,
        validate_threshold,
    },
};

/// A percentage discount on the whole basket above an order value
#[derive(Debug, Clone)]
pub struct OrderValuePercentageDiscount<'a> {
    key: PromotionKey,
    threshold: Money<'a, Currency>,
    percent: Percentage,
}

impl<'a> OrderValuePercentageDiscount<'a> {
    /// Create a new order value discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the threshold is negative or the percentage is outside
    /// 0% to 100%.
    pub fn new(
        key: PromotionKey,
        threshold: Money<'a, Currency>,
        percent: Percentage,
    ) -> Result<Self, PromotionError> {
        validate_threshold(&threshold)?;
        validate_percentage(&percent)?;

        Ok(Self {
            key,
            threshold,
            percent,
        })
    }

    /// Return the order value the subtotal must exceed
    pub fn threshold(&self) -> &Money<'a, Currency> {
        &self.threshold
    }

    /// Return the discount percentage
    pub fn percent(&self) -> Percentage {
        self.percent
    }
}

impl<'a> Promotion<'a> for OrderValuePercentageDiscount<'a> {
    fn key(&self) -> PromotionKey {
        self.key
    }

    fn apply(&mut self, basket: &mut Basket<'a>) -> Result<(), PromotionError> {
        ensure_currency(&self.threshold, basket)?;

        let subtotal = basket.subtotal()?;

        if subtotal.to_minor_units() <= self.threshold.to_minor_units() {
            return Ok(());
        }

        for item in basket.iter_mut() {
            let reduced = reduce_by_percent(item.discount_price(), &self.percent)?;

            trace!(
                code = item.code(),
                from = %item.discount_price(),
                to = %reduced,
                "order value discount"
            );

            item.set_discount_price(reduced);
        }

        Ok(())
    }
}
