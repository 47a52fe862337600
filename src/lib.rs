//! Checkout
//!
//! Checkout prices a basket of items under a set of interacting promotions. Promotions mutate
//! the basket one after another, so the final price depends on the order they are applied in;
//! the cart searches every order and keeps the cheapest.

pub mod basket;
pub mod cart;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod promotions;
pub mod receipt;
pub mod solvers;
pub mod utils;
