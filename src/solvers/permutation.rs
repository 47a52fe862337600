//! Permutation Solver
//!
//! Tries every order of the promotions and keeps the cheapest. The search is exhaustive, so the
//! cost grows factorially with the number of promotions.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::{
    basket::Basket,
    promotions::BoxedPromotion,
    solvers::{Solver, SolverError, SolverResult, empty_result, order_keys, run_trial},
};

/// Promotion count above which an exhaustive search is logged as expensive.
pub const MAX_EXHAUSTIVE_PROMOTIONS: usize = 8;

type Order = SmallVec<[usize; 8]>;

/// Solver that evaluates every promotion order
#[derive(Debug)]
pub struct PermutationSolver;

impl Solver for PermutationSolver {
    fn solve<'a>(
        promotions: &mut [BoxedPromotion<'a>],
        basket: &mut Basket<'a>,
    ) -> Result<SolverResult<'a>, SolverError> {
        // Gifts from an earlier computation would otherwise count towards every trial.
        let removed = basket.remove_gifts();

        if removed > 0 {
            debug!(removed, "removed previously added gifts");
        }

        if basket.is_empty() {
            return Ok(empty_result(basket));
        }

        if promotions.len() > MAX_EXHAUSTIVE_PROMOTIONS {
            warn!(
                promotions = promotions.len(),
                "exhaustive search over many promotions may be slow"
            );
        }

        let snapshot = basket.snapshot();

        let mut order: Order = (0..promotions.len()).collect();
        let mut best: Option<(Money<'a, Currency>, Order)> = None;
        let mut trials = 0;

        loop {
            let total = run_trial(promotions, basket, &snapshot, &order)?;

            trials += 1;

            debug!(trial = trials, order = ?order.as_slice(), %total, "evaluated promotion order");

            let improved = best
                .as_ref()
                .is_none_or(|(best_total, _)| total.to_minor_units() < best_total.to_minor_units());

            if improved {
                best = Some((total, order.clone()));
            }

            if !next_permutation(&mut order) {
                break;
            }
        }

        let Some((best_total, best_order)) = best else {
            return Err(SolverError::InvariantViolation {
                message: "no promotion order was evaluated",
            });
        };

        // The basket holds the last evaluated order; re-run the winner if it differs.
        if best_order != order {
            let replayed = run_trial(promotions, basket, &snapshot, &best_order)?;

            if replayed != best_total {
                return Err(SolverError::InvariantViolation {
                    message: "replaying the best promotion order produced a different total",
                });
            }
        }

        let keys = order_keys(promotions, &best_order);

        info!(trials, total = %best_total, order = ?keys.as_slice(), "selected promotion order");

        Ok(SolverResult {
            total: best_total,
            order: keys,
            trials,
        })
    }
}

/// Advance to the next lexicographic permutation in place.
///
/// Returns `false`, leaving `order` untouched, once the last permutation has been reached.
fn next_permutation(order: &mut [usize]) -> bool {
    let Some(pivot) = order
        .windows(2)
        .rposition(|pair| matches!(pair, [a, b] if a < b))
    else {
        return false;
    };

    let Some(pivot_value) = order.get(pivot).copied() else {
        return false;
    };

    let Some(successor) = order.iter().rposition(|value| *value > pivot_value) else {
        return false;
    };

    order.swap(pivot, successor);

    if let Some(tail) = order.get_mut(pivot + 1..) {
        tail.reverse();
    }

    true
}
