//! One-Time Coupon
//!
//! A percentage off a single item, identified by code, that can only be redeemed once between
//! resets.

use decimal_percentage::Percentage;
use tracing::trace;

use crate::{
    basket::Basket,
    discounts::reduce_by_percent,
    promotions::{Promotion, PromotionError, PromotionKey, PromotionState, validate_percentage},
};

/// A single-use percentage coupon for one item
#[derive(Debug, Clone)]
pub struct OneTimeCouponPromotion {
    key: PromotionKey,
    item_code: String,
    percent: Percentage,
    state: PromotionState,
}

impl OneTimeCouponPromotion {
    /// Create a new coupon for the item with the given code.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidPercentage`] if the percentage is outside 0% to 100%.
    pub fn new(
        key: PromotionKey,
        item_code: impl Into<String>,
        percent: Percentage,
    ) -> Result<Self, PromotionError> {
        validate_percentage(&percent)?;

        Ok(Self {
            key,
            item_code: item_code.into(),
            percent,
            state: PromotionState::Fresh,
        })
    }

    /// Return the code of the item the coupon targets
    pub fn item_code(&self) -> &str {
        &self.item_code
    }

    /// Return the discount percentage
    pub fn percent(&self) -> Percentage {
        self.percent
    }
}

impl<'a> Promotion<'a> for OneTimeCouponPromotion {
    fn key(&self) -> PromotionKey {
        self.key
    }

    fn apply(&mut self, basket: &mut Basket<'a>) -> Result<(), PromotionError> {
        if self.state == PromotionState::Used {
            return Ok(());
        }

        // An absent item leaves the coupon unredeemed.
        let Some(item) = basket.find_mut(&self.item_code) else {
            return Ok(());
        };

        let reduced = reduce_by_percent(item.discount_price(), &self.percent)?;

        trace!(code = item.code(), to = %reduced, "coupon redeemed");

        item.set_discount_price(reduced);
        self.state = PromotionState::Used;

        Ok(())
    }

    fn reset(&mut self) {
        self.state = PromotionState::Fresh;
    }

    fn state(&self) -> PromotionState {
        self.state
    }
}
