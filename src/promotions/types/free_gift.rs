//! Free Gift
//!
//! Adds a single zero-priced gift item once the basket's base-price subtotal reaches a threshold.

use rusty_money::{Money, iso::Currency};
use slotmap::Key;
use tracing::trace;

use crate::{
    basket::Basket,
    items::Item,
    promotions::{
        Promotion, PromotionError, PromotionKey, PromotionState, ensure_currency,
        validate_threshold,
    },
};

/// Adds a free gift item above an order value
#[derive(Debug, Clone)]
pub struct FreeGiftPromotion<'a> {
    key: PromotionKey,
    threshold: Money<'a, Currency>,
    gift_name: String,
    state: PromotionState,
}

impl<'a> FreeGiftPromotion<'a> {
    /// Create a new free gift promotion.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::NegativeThreshold`] if the threshold is below zero.
    pub fn new(
        key: PromotionKey,
        threshold: Money<'a, Currency>,
        gift_name: impl Into<String>,
    ) -> Result<Self, PromotionError> {
        validate_threshold(&threshold)?;

        Ok(Self {
            key,
            threshold,
            gift_name: gift_name.into(),
            state: PromotionState::Fresh,
        })
    }

    /// Return the order value the subtotal must reach
    pub fn threshold(&self) -> &Money<'a, Currency> {
        &self.threshold
    }

    /// Return the name given to the gift item
    pub fn gift_name(&self) -> &str {
        &self.gift_name
    }
}

impl<'a> Promotion<'a> for FreeGiftPromotion<'a> {
    fn key(&self) -> PromotionKey {
        self.key
    }

    fn apply(&mut self, basket: &mut Basket<'a>) -> Result<(), PromotionError> {
        if self.state == PromotionState::Used {
            return Ok(());
        }

        ensure_currency(&self.threshold, basket)?;

        let subtotal = basket.subtotal()?;

        if subtotal.to_minor_units() < self.threshold.to_minor_units() || basket.has_gift() {
            return Ok(());
        }

        let gift = Item::gift(
            self.key.data().as_ffi(),
            self.gift_name.as_str(),
            basket.currency(),
        );

        trace!(code = gift.code(), "free gift added");

        basket.add(gift)?;

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
