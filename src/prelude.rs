//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError, BasketSnapshot},
    cart::Cart,
    discounts::DiscountError,
    items::{GIFT_CODE_PREFIX, Item, SortOrder},
    pricing::TotalPriceError,
    promotions::{
        BoxedPromotion, Promotion, PromotionError, PromotionKey, PromotionMeta, PromotionState,
        promotion,
        types::{
            BuyTwoGetThirdFreePromotion, FreeGiftPromotion, OneTimeCouponPromotion,
            OrderValuePercentageDiscount,
        },
    },
    receipt::{Receipt, ReceiptError},
    solvers::{
        Solver, SolverError, SolverResult, permutation::PermutationSolver,
        sequential::SequentialSolver,
    },
};
