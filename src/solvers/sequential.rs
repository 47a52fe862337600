//! Sequential Solver

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    basket::Basket,
    promotions::BoxedPromotion,
    solvers::{Solver, SolverError, SolverResult, empty_result, order_keys, run_trial},
};

/// Solver that applies promotions once, in registration order
#[derive(Debug)]
pub struct SequentialSolver;

impl Solver for SequentialSolver {
    fn solve<'a>(
        promotions: &mut [BoxedPromotion<'a>],
        basket: &mut Basket<'a>,
    ) -> Result<SolverResult<'a>, SolverError> {
        basket.remove_gifts();

        if basket.is_empty() {
            return Ok(empty_result(basket));
        }

        let snapshot = basket.snapshot();
        let order: SmallVec<[usize; 8]> = (0..promotions.len()).collect();

        let total = run_trial(promotions, basket, &snapshot, &order)?;

        debug!(%total, "applied promotions in registration order");

        Ok(SolverResult {
            total,
            order: order_keys(promotions, &order),
            trials: 1,
        })
    }
}
