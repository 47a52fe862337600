//! Integration tests for pricing a cart under interacting promotions.
//!
//! Prices use the same catalogue throughout:
//!
//! | Code | Price   |
//! |------|---------|
//! | P1   | £100.00 |
//! | P2   | £200.00 |
//! | P3   | £50.00  |
//! | P4   | £150.00 |
//! | P5   | £75.00  |
//! | P6   | £25.00  |
//! | P7   | £35.00  |
//! | P8   | £45.00  |
//! | P9   | £15.00  |

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::GBP};
use slotmap::SlotMap;
use testresult::TestResult;

use checkout::prelude::*;

const PRICES: [i64; 9] = [
    10_000, 20_000, 5_000, 15_000, 7_500, 2_500, 3_500, 4_500, 1_500,
];

fn cart_with(n: usize) -> Result<Cart<'static>, BasketError> {
    let mut cart = Cart::new(GBP);

    for (idx, minor) in PRICES.iter().take(n).enumerate() {
        let code = format!("P{}", idx + 1);
        let name = format!("Product {}", idx + 1);

        cart.add_item(Item::new(code, name, Money::from_minor(*minor, GBP)))?;
    }

    Ok(cart)
}

fn gbp(minor: i64) -> Money<'static, rusty_money::iso::Currency> {
    Money::from_minor(minor, GBP)
}

fn order_value(
    key: PromotionKey,
    threshold: i64,
    percent: f64,
) -> Result<BoxedPromotion<'static>, PromotionError> {
    Ok(promotion(OrderValuePercentageDiscount::new(
        key,
        gbp(threshold),
        Percentage::from(percent),
    )?))
}

fn three_for_two(key: PromotionKey) -> BoxedPromotion<'static> {
    promotion(BuyTwoGetThirdFreePromotion::new(key))
}

#[test]
fn order_value_discount_alone() -> TestResult {
    let mut cart = cart_with(3)?;

    cart.add_promotion(order_value(PromotionKey::default(), 30_000, 0.05)?);

    assert_eq!(cart.calculate_total()?, gbp(33_250));

    Ok(())
}

#[test]
fn buy_two_get_third_free_over_basket_sizes() -> TestResult {
    for (n, expected) in [(3, 30_000), (5, 52_500), (6, 52_500), (9, 62_000)] {
        let mut cart = cart_with(n)?;

        cart.add_promotion(three_for_two(PromotionKey::default()));

        assert_eq!(cart.calculate_total()?, gbp(expected), "{n} items");
    }

    Ok(())
}

#[test]
fn tied_orders_keep_registration_order() -> TestResult {
    let mut keys = SlotMap::<PromotionKey, PromotionMeta>::with_key();
    let discount = keys.insert(PromotionMeta::default());
    let free = keys.insert(PromotionMeta::default());

    // 5% then P3 free, and P3 free then 5%, both come to £285.00.
    let mut cart = cart_with(3)?;

    cart.add_promotion(order_value(discount, 30_000, 0.05)?);
    cart.add_promotion(three_for_two(free));

    assert_eq!(cart.calculate_total()?, gbp(28_500));

    let result = cart.last_result().ok_or("cart was priced")?;

    assert_eq!(result.trials, 2);
    assert_eq!(result.order.as_slice(), [discount, free]);

    Ok(())
}

#[test]
fn basket_keeps_prices_from_best_order() -> TestResult {
    let mut keys = SlotMap::<PromotionKey, PromotionMeta>::with_key();
    let half_off = keys.insert(PromotionMeta::default());
    let free = keys.insert(PromotionMeta::default());

    // Both orders leave P1 at £50.00, P2 at £100.00 and P3 free.
    let mut cart = cart_with(3)?;

    cart.add_promotion(order_value(half_off, 25_000, 0.5)?);
    cart.add_promotion(three_for_two(free));

    let total = cart.calculate_total()?;

    assert_eq!(total, gbp(15_000));
    assert_eq!(cart.basket().total()?, total);

    let prices: Vec<i64> = cart
        .items()
        .iter()
        .map(|item| item.discount_price().to_minor_units())
        .collect();

    assert_eq!(prices, [5_000, 10_000, 0]);

    Ok(())
}

#[test]
fn multiple_promotions_beat_base_price() -> TestResult {
    let mut keys = SlotMap::<PromotionKey, PromotionMeta>::with_key();
    let mut cart = cart_with(4)?;

    cart.add_promotion(order_value(
        keys.insert(PromotionMeta::default()),
        30_000,
        0.05,
    )?);
    cart.add_promotion(three_for_two(keys.insert(PromotionMeta::default())));
    cart.add_promotion(promotion(OneTimeCouponPromotion::new(
        keys.insert(PromotionMeta::default()),
        "P2",
        Percentage::from(0.3),
    )?));

    let total = cart.calculate_total()?;

    assert_eq!(total, gbp(37_050));
    assert!(total.to_minor_units() < 50_000);
    assert_eq!(cart.last_result().map(|result| result.trials), Some(6));

    Ok(())
}

#[test]
fn repeated_calculation_is_stable() -> TestResult {
    let mut cart = cart_with(4)?;

    cart.add_promotion(order_value(PromotionKey::default(), 30_000, 0.05)?);
    cart.add_promotion(three_for_two(PromotionKey::default()));
    cart.add_promotion(promotion(FreeGiftPromotion::new(
        PromotionKey::default(),
        gbp(20_000),
        "Mug",
    )?));

    let first = cart.calculate_total()?;
    let first_len = cart.items().len();
    let second = cart.calculate_total()?;

    assert_eq!(first, second);
    assert_eq!(cart.items().len(), first_len);

    Ok(())
}

#[test]
fn single_promotion_matches_sequential_application() -> TestResult {
    let mut searched = cart_with(3)?;
    let mut sequential = cart_with(3)?;

    searched.add_promotion(order_value(PromotionKey::default(), 30_000, 0.05)?);
    sequential.add_promotion(order_value(PromotionKey::default(), 30_000, 0.05)?);

    let searched_total = searched.calculate_total()?;
    let sequential_total = sequential.calculate_total_with::<SequentialSolver>()?;

    assert_eq!(searched_total, sequential_total);
    assert_eq!(searched.last_result().map(|result| result.trials), Some(1));

    Ok(())
}

#[test]
fn coupon_discounts_one_item_once() -> TestResult {
    let mut cart = cart_with(2)?;

    cart.add_promotion(promotion(OneTimeCouponPromotion::new(
        PromotionKey::default(),
        "P2",
        Percentage::from(0.3),
    )?));

    assert_eq!(cart.calculate_total()?, gbp(24_000));
    assert_eq!(
        cart.promotions().first().map(|promotion| promotion.state()),
        Some(PromotionState::Used)
    );

    // Pricing again starts from fresh state rather than stacking a second redemption.
    assert_eq!(cart.calculate_total()?, gbp(24_000));

    Ok(())
}

#[test]
fn free_gift_is_added_once() -> TestResult {
    let mut cart = cart_with(2)?;

    cart.add_promotion(promotion(FreeGiftPromotion::new(
        PromotionKey::default(),
        gbp(20_000),
        "Mug",
    )?));

    assert_eq!(cart.calculate_total()?, gbp(30_000));
    assert_eq!(cart.calculate_total()?, gbp(30_000));

    let gifts: Vec<&Item<'_>> = cart.items().iter().filter(|item| item.is_gift()).collect();

    assert_eq!(cart.items().len(), 3);
    assert_eq!(gifts.len(), 1);
    assert!(
        gifts
            .first()
            .is_some_and(|gift| gift.discount_price().is_zero()
                && gift.code().starts_with(GIFT_CODE_PREFIX))
    );

    Ok(())
}

#[test]
fn free_gift_with_order_value_discount() -> TestResult {
    let mut cart = cart_with(3)?;

    cart.add_promotion(promotion(FreeGiftPromotion::new(
        PromotionKey::default(),
        gbp(30_000),
        "Mug",
    )?));
    cart.add_promotion(order_value(PromotionKey::default(), 30_000, 0.1)?);

    assert_eq!(cart.calculate_total()?, gbp(31_500));
    assert_eq!(cart.items().len(), 4);

    Ok(())
}

#[test]
fn gift_is_dropped_when_cart_no_longer_qualifies() -> TestResult {
    let mut cart = cart_with(3)?;

    cart.add_promotion(promotion(FreeGiftPromotion::new(
        PromotionKey::default(),
        gbp(30_000),
        "Mug",
    )?));

    cart.calculate_total()?;
    assert_eq!(cart.items().len(), 4);

    cart.remove_item("P2");
    cart.calculate_total()?;

    assert_eq!(cart.items().len(), 2);
    assert!(!cart.basket().has_gift());

    Ok(())
}

#[test]
fn removing_promotions_restores_base_total() -> TestResult {
    let mut keys = SlotMap::<PromotionKey, PromotionMeta>::with_key();
    let discount = keys.insert(PromotionMeta::default());

    let mut cart = cart_with(2)?;

    cart.add_promotion(order_value(discount, 20_000, 0.1)?);

    assert_eq!(cart.calculate_total()?, gbp(27_000));

    cart.remove_promotion(discount);

    assert_eq!(cart.calculate_total()?, gbp(30_000));
    assert_eq!(cart.total_before_promotions()?, gbp(30_000));

    cart.add_promotion(order_value(discount, 20_000, 0.1)?);
    cart.clear_promotions();

    assert_eq!(cart.calculate_total()?, gbp(30_000));

    Ok(())
}

#[test]
fn empty_cart_totals_zero() -> TestResult {
    let mut cart = Cart::new(GBP);

    cart.add_promotion(three_for_two(PromotionKey::default()));

    assert_eq!(cart.calculate_total()?, gbp(0));
    assert_eq!(cart.last_result().map(|result| result.trials), Some(0));

    Ok(())
}

#[test]
fn presentation_orders() -> TestResult {
    let mut cart = cart_with(4)?;

    let codes = |cart: &Cart<'_>| -> Vec<String> {
        cart.sorted_items()
            .iter()
            .map(|item| item.code().to_string())
            .collect()
    };

    assert_eq!(codes(&cart), ["P2", "P4", "P1", "P3"]);

    cart.set_sort_order(SortOrder::PriceAsc);
    assert_eq!(codes(&cart), ["P3", "P1", "P4", "P2"]);

    cart.set_sort_order(SortOrder::Name);
    assert_eq!(codes(&cart), ["P1", "P2", "P3", "P4"]);

    cart.add_promotion(promotion(OneTimeCouponPromotion::new(
        PromotionKey::default(),
        "P2",
        Percentage::from(0.5),
    )?));
    cart.calculate_total()?;
    cart.set_sort_order(SortOrder::DiscountPriceDesc);

    // P2 is now £100.00, tied with P1; names break the tie.
    assert_eq!(codes(&cart), ["P4", "P1", "P2", "P3"]);

    Ok(())
}

#[test]
fn lookups() -> TestResult {
    let cart = cart_with(9)?;

    assert_eq!(cart.cheapest_item().map(Item::code), Some("P9"));
    assert_eq!(cart.most_expensive_item().map(Item::code), Some("P2"));

    let cheapest: Vec<&str> = cart
        .n_cheapest_items(3)
        .iter()
        .map(|item| item.code())
        .collect();
    let dearest: Vec<&str> = cart
        .n_most_expensive_items(2)
        .iter()
        .map(|item| item.code())
        .collect();

    assert_eq!(cheapest, ["P9", "P6", "P7"]);
    assert_eq!(dearest, ["P2", "P4"]);

    Ok(())
}

/// Caps every item still at full price, so only the first cap applied takes effect.
#[derive(Debug)]
struct PriceCap {
    key: PromotionKey,
    minor: i64,
}

impl<'a> Promotion<'a> for PriceCap {
    fn key(&self) -> PromotionKey {
        self.key
    }

    fn apply(&mut self, basket: &mut Basket<'a>) -> Result<(), PromotionError> {
        let currency = basket.currency();

        for item in basket.iter_mut() {
            if item.discount_price() == item.base_price() {
                item.set_discount_price(Money::from_minor(self.minor, currency));
            }
        }

        Ok(())
    }
}

#[test]
fn search_prefers_cheaper_order_over_registration_order() -> TestResult {
    let mut keys = SlotMap::<PromotionKey, PromotionMeta>::with_key();
    let dear = keys.insert(PromotionMeta::default());
    let cheap = keys.insert(PromotionMeta::default());
    let middle = keys.insert(PromotionMeta::default());

    let mut cart = cart_with(2)?;

    cart.add_promotion(promotion(PriceCap { key: dear, minor: 5_000 }));
    cart.add_promotion(promotion(PriceCap { key: cheap, minor: 1_000 }));
    cart.add_promotion(promotion(PriceCap { key: middle, minor: 3_000 }));

    let total = cart.calculate_total()?;

    assert_eq!(total, gbp(2_000));
    assert_eq!(cart.basket().total()?, total);
    assert_eq!(
        cart.last_result().map(|result| result.order.to_vec()),
        Some(vec![cheap, dear, middle])
    );

    assert_eq!(cart.calculate_total_with::<SequentialSolver>()?, gbp(10_000));

    Ok(())
}
