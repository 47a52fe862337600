//! Promotion Types

mod buy_two_get_third_free;
mod free_gift;
mod one_time_coupon;
mod order_value_discount;

pub use buy_two_get_third_free::*;
pub use free_gift::*;
pub use one_time_coupon::*;
pub use order_value_discount::*;
