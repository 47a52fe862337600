//! Promotions
//!
//! A promotion is a rule that mutates the discount prices (and occasionally the membership) of a
//! basket. Promotions are applied one after another, so the outcome depends on their order.

use std::fmt::Debug;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::new_key_type;
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    discounts::{DiscountError, percent_value},
    pricing::TotalPriceError,
};

pub mod types;

new_key_type! {
    /// Promotion Key
    pub struct PromotionKey;
}

/// Promotion metadata
#[derive(Debug, Default, Clone)]
pub struct PromotionMeta {
    /// Promotion name
    pub name: String,
}

/// Lifecycle of a promotion between resets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PromotionState {
    /// Never applied, or reset since the last application
    #[default]
    Fresh,

    /// The one-shot effect has fired
    Used,
}

/// Errors raised while configuring or applying a promotion.
#[derive(Debug, Error, PartialEq)]
pub enum PromotionError {
    /// Percentage outside the range 0% to 100%.
    #[error("percentage {0} is outside the range 0 to 1")]
    InvalidPercentage(Decimal),

    /// Threshold below zero.
    #[error("threshold must not be negative")]
    NegativeThreshold,

    /// Promotion configured in a different currency to the basket (promotion, basket).
    #[error("promotion has currency {0}, but basket has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped discount calculation error.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Wrapped total price error.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Wrapped basket error.
    #[error(transparent)]
    Basket(#[from] BasketError),
}

/// A pricing rule applied to a basket.
///
/// `apply` mutates the basket in place; `reset` returns the promotion to the state it had right
/// after construction. Implementations must be deterministic given the same basket and state.
pub trait Promotion<'a>: Debug {
    /// Return the key of the promotion
    fn key(&self) -> PromotionKey;

    /// Apply the promotion to the basket.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the basket cannot be priced under this promotion.
    fn apply(&mut self, basket: &mut Basket<'a>) -> Result<(), PromotionError>;

    /// Restore the post-construction state.
    fn reset(&mut self) {}

    /// Current lifecycle state. Stateless promotions are always `Fresh`.
    fn state(&self) -> PromotionState {
        PromotionState::Fresh
    }
}

/// Promotion object owned by a cart or solver.
pub type BoxedPromotion<'a> = Box<dyn Promotion<'a> + 'a>;

/// Box any promotion implementation into a promotion object.
pub fn promotion<'a, P>(promotion: P) -> BoxedPromotion<'a>
where
    P: Promotion<'a> + 'a,
{
    Box::new(promotion)
}

pub(crate) fn validate_percentage(percent: &Percentage) -> Result<(), PromotionError> {
    let value = percent_value(percent);

    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(PromotionError::InvalidPercentage(value));
    }

    Ok(())
}

pub(crate) fn validate_threshold(threshold: &Money<'_, Currency>) -> Result<(), PromotionError> {
    if threshold.to_minor_units() < 0 {
        return Err(PromotionError::NegativeThreshold);
    }

    Ok(())
}

pub(crate) fn ensure_currency(
    threshold: &Money<'_, Currency>,
    basket: &Basket<'_>,
) -> Result<(), PromotionError> {
    let promotion_currency = threshold.currency();

    if promotion_currency == basket.currency() {
        Ok(())
    } else {
        Err(PromotionError::CurrencyMismatch(
            promotion_currency.iso_alpha_code,
            basket.currency().iso_alpha_code,
        ))
    }
}
