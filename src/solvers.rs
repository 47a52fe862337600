//! Solvers for Promotions
//!
//! A solver decides the order in which a basket's promotions are applied and leaves the basket
//! priced by that order.

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    basket::{Basket, BasketSnapshot},
    pricing::TotalPriceError,
    promotions::{BoxedPromotion, PromotionError, PromotionKey},
};

pub mod permutation;
pub mod sequential;

/// Solver Errors
#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    /// Wrapped promotion error
    #[error(transparent)]
    Promotion(#[from] PromotionError),

    /// Wrapped total price error
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Result of pricing a basket under its promotions
#[derive(Debug, Clone)]
pub struct SolverResult<'a> {
    /// Total cost of the items after applying promotions
    pub total: Money<'a, Currency>,

    /// Keys of the promotions in the order they were applied
    pub order: SmallVec<[PromotionKey; 8]>,

    /// Number of orders evaluated
    pub trials: usize,
}

/// Trait for pricing a basket under a set of promotions
pub trait Solver {
    /// Price the basket, leaving its items and the promotions in the state of the chosen order.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if any promotion fails to apply or the basket cannot be totalled.
    fn solve<'a>(
        promotions: &mut [BoxedPromotion<'a>],
        basket: &mut Basket<'a>,
    ) -> Result<SolverResult<'a>, SolverError>;
}

/// Reset everything, then apply the promotions at the given indexes in order and sum the result.
pub(crate) fn run_trial<'a>(
    promotions: &mut [BoxedPromotion<'a>],
    basket: &mut Basket<'a>,
    snapshot: &BasketSnapshot<'a>,
    order: &[usize],
) -> Result<Money<'a, Currency>, SolverError> {
    promotions.iter_mut().for_each(|promotion| promotion.reset());

    basket.restore(snapshot);
    basket.reset_discounts();

    for &idx in order {
        let promotion = promotions
            .get_mut(idx)
            .ok_or(SolverError::InvariantViolation {
                message: "promotion order refers to a missing promotion",
            })?;

        promotion.apply(basket)?;
    }

    Ok(basket.total()?)
}

/// Keys of the promotions at the given indexes.
pub(crate) fn order_keys(
    promotions: &[BoxedPromotion<'_>],
    order: &[usize],
) -> SmallVec<[PromotionKey; 8]> {
    order
        .iter()
        .filter_map(|idx| promotions.get(*idx).map(|promotion| promotion.key()))
        .collect()
}

/// Result for a basket with nothing to price.
pub(crate) fn empty_result<'a>(basket: &Basket<'a>) -> SolverResult<'a> {
    SolverResult {
        total: Money::from_minor(0, basket.currency()),
        order: SmallVec::new(),
        trials: 0,
    }
}
