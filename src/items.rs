//! Items

use std::{
    cmp::{Ordering, Reverse},
    fmt::Display,
};

use clap::ValueEnum;
use rusty_money::{Money, MoneyError, iso::Currency};

/// Code prefix reserved for items added to a basket by gift promotions.
pub const GIFT_CODE_PREFIX: &str = "GIFT-";

/// A priced item with a resettable discounted price.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<'a> {
    code: String,
    name: String,
    base_price: Money<'a, Currency>,
    discount_price: Money<'a, Currency>,
}

impl<'a> Item<'a> {
    /// Creates a new item. The discount price starts out equal to the base price.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        base_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            base_price,
            discount_price: base_price,
        }
    }

    /// Creates a zero-priced gift item whose code is `GIFT-<suffix>`.
    pub fn gift(suffix: impl Display, name: impl Into<String>, currency: &'a Currency) -> Self {
        Self::new(
            format!("{GIFT_CODE_PREFIX}{suffix}"),
            name,
            Money::from_minor(0, currency),
        )
    }

    /// Returns the item code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the item name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of the item before any promotions
    pub fn base_price(&self) -> &Money<'a, Currency> {
        &self.base_price
    }

    /// Returns the price of the item after the promotions applied so far
    pub fn discount_price(&self) -> &Money<'a, Currency> {
        &self.discount_price
    }

    /// Overwrites the discounted price. No clamping is performed.
    pub fn set_discount_price(&mut self, price: Money<'a, Currency>) {
        self.discount_price = price;
    }

    /// Restores the discounted price to the base price.
    pub fn reset_discount(&mut self) {
        self.discount_price = self.base_price;
    }

    /// Whether this item was added by a gift promotion.
    pub fn is_gift(&self) -> bool {
        self.code.starts_with(GIFT_CODE_PREFIX)
    }

    /// Returns the difference between the base price and the discounted price.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the two prices have different currencies.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.base_price.sub(self.discount_price)
    }
}

/// Presentation order for items.
///
/// Sorting never affects pricing; price orders fall back to the item name on ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Most expensive base price first
    #[default]
    PriceDesc,

    /// Cheapest base price first
    PriceAsc,

    /// Alphabetical by name
    Name,

    /// Most expensive discounted price first
    DiscountPriceDesc,
}

impl SortOrder {
    /// Compare two items under this order.
    pub fn compare(self, a: &Item<'_>, b: &Item<'_>) -> Ordering {
        match self {
            SortOrder::PriceDesc => minor(b.base_price())
                .cmp(&minor(a.base_price()))
                .then_with(|| a.name().cmp(b.name())),
            SortOrder::PriceAsc => minor(a.base_price())
                .cmp(&minor(b.base_price()))
                .then_with(|| a.name().cmp(b.name())),
            SortOrder::Name => a.name().cmp(b.name()),
            SortOrder::DiscountPriceDesc => minor(b.discount_price())
                .cmp(&minor(a.discount_price()))
                .then_with(|| a.name().cmp(b.name())),
        }
    }

    /// Sort a list of item references in place (stable).
    pub fn sort(self, items: &mut [&Item<'_>]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}

fn minor(price: &Money<'_, Currency>) -> i64 {
    price.to_minor_units()
}

/// Returns the cheapest item by base price; the first one wins on ties.
pub fn cheapest_item<'i, 'a>(items: &'i [Item<'a>]) -> Option<&'i Item<'a>> {
    items.iter().min_by_key(|item| minor(item.base_price()))
}

/// Returns the most expensive item by base price; the first one wins on ties.
pub fn most_expensive_item<'i, 'a>(items: &'i [Item<'a>]) -> Option<&'i Item<'a>> {
    items.iter().min_by_key(|item| Reverse(minor(item.base_price())))
}

/// Returns up to `n` items, cheapest base price first.
pub fn n_cheapest_items<'i, 'a>(items: &'i [Item<'a>], n: usize) -> Vec<&'i Item<'a>> {
    let mut ranked: Vec<&Item<'a>> = items.iter().collect();

    ranked.sort_by_key(|item| minor(item.base_price()));
    ranked.truncate(n);

    ranked
}

/// Returns up to `n` items, most expensive base price first.
pub fn n_most_expensive_items<'i, 'a>(items: &'i [Item<'a>], n: usize) -> Vec<&'i Item<'a>> {
    let mut ranked: Vec<&Item<'a>> = items.iter().collect();

    ranked.sort_by_key(|item| Reverse(minor(item.base_price())));
    ranked.truncate(n);

    ranked
}
