//! Buy Two, Get Third Free
//!
//! For every three non-gift items in the basket, the cheapest one is free. Items are ranked across
//! the whole basket rather than per group of three, so `floor(n / 3)` of the cheapest items are
//! discounted to zero.

use rusty_money::Money;
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    basket::Basket,
    promotions::{Promotion, PromotionError, PromotionKey},
};

/// Makes every third item free, cheapest first
#[derive(Debug, Clone, Copy)]
pub struct BuyTwoGetThirdFreePromotion {
    key: PromotionKey,
}

impl BuyTwoGetThirdFreePromotion {
    /// Create a new buy-two-get-third-free promotion.
    pub fn new(key: PromotionKey) -> Self {
        Self { key }
    }
}

impl<'a> Promotion<'a> for BuyTwoGetThirdFreePromotion {
    fn key(&self) -> PromotionKey {
        self.key
    }

    fn apply(&mut self, basket: &mut Basket<'a>) -> Result<(), PromotionError> {
        // Ranking borrows item names, so it must end before the basket is mutated.
        let free: SmallVec<[usize; 8]> = {
            // (base price, name, index) of every eligible item
            let mut ranked: SmallVec<[(i64, &str, usize); 16]> = basket
                .iter()
                .enumerate()
                .filter(|(_idx, item)| !item.is_gift())
                .map(|(idx, item)| (item.base_price().to_minor_units(), item.name(), idx))
                .collect();

            let free_count = ranked.len() / 3;

            ranked.sort_unstable();

            ranked
                .iter()
                .take(free_count)
                .map(|(_price, _name, idx)| *idx)
                .collect()
        };

        if free.is_empty() {
            return Ok(());
        }

        let currency = basket.currency();

        for idx in free {
            if let Some(item) = basket.items_mut().get_mut(idx) {
                trace!(code = item.code(), "third item free");

                item.set_discount_price(Money::from_minor(0, currency));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{basket::BasketError, items::Item};

    use super::*;

    fn basket<'a>(prices: &[i64]) -> Result<Basket<'a>, BasketError> {
        let items: Vec<Item<'a>> = prices
            .iter()
            .enumerate()
            .map(|(i, minor)| {
                Item::new(
                    format!("P{}", i + 1),
                    format!("Product {}", i + 1),
                    Money::from_minor(*minor, GBP),
                )
            })
            .collect();

        Basket::with_items(items, GBP)
    }

    fn apply(basket: &mut Basket<'_>) -> Result<(), PromotionError> {
        BuyTwoGetThirdFreePromotion::new(PromotionKey::default()).apply(basket)
    }

    fn free_codes(basket: &Basket<'_>) -> Vec<String> {
        basket
            .iter()
            .filter(|item| item.discount_price().is_zero())
            .map(|item| item.code().to_string())
            .collect()
    }

    #[test]
    fn three_items_cheapest_free() -> TestResult {
        let mut basket = basket(&[10_000, 20_000, 5_000])?;

        apply(&mut basket)?;

        assert_eq!(free_codes(&basket), ["P3"]);
        assert_eq!(basket.total()?, Money::from_minor(30_000, GBP));

        Ok(())
    }

    #[test]
    fn nine_items_three_cheapest_free() -> TestResult {
        let mut basket = basket(&[
            10_000, 20_000, 5_000, 15_000, 7_500, 2_500, 3_500, 4_500, 1_500,
        ])?;

        apply(&mut basket)?;

        assert_eq!(free_codes(&basket), ["P6", "P7", "P9"]);
        assert_eq!(basket.total()?, Money::from_minor(62_000, GBP));

        Ok(())
    }

    #[test]
    fn six_and_five_items() -> TestResult {
        let mut six = basket(&[10_000, 20_000, 5_000, 15_000, 7_500, 2_500])?;
        let mut five = basket(&[10_000, 20_000, 5_000, 15_000, 7_500])?;

        apply(&mut six)?;
        apply(&mut five)?;

        assert_eq!(six.total()?, Money::from_minor(52_500, GBP));
        assert_eq!(five.total()?, Money::from_minor(52_500, GBP));

        Ok(())
    }

    #[test]
    fn fewer_than_three_items_has_no_effect() -> TestResult {
        let mut basket = basket(&[10_000, 20_000])?;

        apply(&mut basket)?;

        assert!(free_codes(&basket).is_empty());

        Ok(())
    }

    #[test]
    fn gifts_are_not_eligible() -> TestResult {
        let mut basket = basket(&[10_000, 20_000])?;

        basket.add(Item::gift(1, "Mug", GBP))?;

        apply(&mut basket)?;

        assert_eq!(basket.total()?, Money::from_minor(30_000, GBP));

        Ok(())
    }

    #[test]
    fn ties_resolve_by_name_then_position() -> TestResult {
        let mut basket = Basket::with_items(
            [
                Item::new("B", "Banana", Money::from_minor(100, GBP)),
                Item::new("A2", "Apple", Money::from_minor(100, GBP)),
                Item::new("A1", "Apple", Money::from_minor(100, GBP)),
            ],
            GBP,
        )?;

        apply(&mut basket)?;

        assert_eq!(free_codes(&basket), ["A2"]);

        Ok(())
    }
}
