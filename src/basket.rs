//! Basket

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    items::{self, Item},
    pricing::{TotalPriceError, total_discounted_price, total_price},
};

/// Errors related to basket construction or totals.
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// An item's currency differs from the basket currency (index, item currency, basket currency).
    #[error("Item {0} has currency {1}, but basket has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// An item was not found in the basket.
    #[error("Item {0} not found")]
    ItemNotFound(usize),
}

/// An ordered collection of items in a single currency.
///
/// Item codes are not required to be unique. Lookups by code resolve to the first match.
#[derive(Debug, Clone)]
pub struct Basket<'a> {
    items: Vec<Item<'a>>,
    currency: &'static Currency,
}

/// A copy of a basket's items, used to undo structural changes between pricing trials.
#[derive(Debug, Clone)]
pub struct BasketSnapshot<'a> {
    items: Vec<Item<'a>>,
}

impl BasketSnapshot<'_> {
    /// Number of items captured in the snapshot.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> Basket<'a> {
    /// Create a new, empty basket.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Basket {
            items: Vec::new(),
            currency,
        }
    }

    /// Create a new basket with the given items.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if there was a currency mismatch error.
    pub fn with_items(
        items: impl Into<Vec<Item<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, BasketError> {
        let items = items.into();

        items
            .iter()
            .enumerate()
            .try_for_each(|(i, item)| check_currency(i, item, currency))?;

        Ok(Basket { items, currency })
    }

    /// Append an item to the end of the basket.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError::CurrencyMismatch` if the item is priced in another currency.
    pub fn add(&mut self, item: Item<'a>) -> Result<(), BasketError> {
        check_currency(self.items.len(), &item, self.currency)?;

        self.items.push(item);

        Ok(())
    }

    /// Remove the first item with the given code, keeping the order of the rest.
    ///
    /// Returns `None` if no item has that code.
    pub fn remove(&mut self, code: &str) -> Option<Item<'a>> {
        let idx = self.items.iter().position(|item| item.code() == code)?;

        Some(self.items.remove(idx))
    }

    /// Remove every gift item, returning how many were removed.
    pub fn remove_gifts(&mut self) -> usize {
        let before = self.items.len();

        self.items.retain(|item| !item.is_gift());

        before - self.items.len()
    }

    /// Whether the basket currently holds a gift item.
    pub fn has_gift(&self) -> bool {
        self.items.iter().any(Item::is_gift)
    }

    /// The items in the basket, in order.
    pub fn items(&self) -> &[Item<'a>] {
        &self.items
    }

    /// The items in the basket, mutably. Changes are visible to the basket.
    pub fn items_mut(&mut self) -> &mut [Item<'a>] {
        &mut self.items
    }

    /// Iterate over the items in the basket.
    pub fn iter(&self) -> impl Iterator<Item = &Item<'a>> {
        self.items.iter()
    }

    /// Iterate mutably over the items in the basket.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Item<'a>> {
        self.items.iter_mut()
    }

    /// Get an item from the basket by index.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError::ItemNotFound` if the item is not found.
    pub fn get_item(&self, item: usize) -> Result<&Item<'a>, BasketError> {
        self.items.get(item).ok_or(BasketError::ItemNotFound(item))
    }

    /// Find the first item with the given code.
    pub fn find(&self, code: &str) -> Option<&Item<'a>> {
        self.items.iter().find(|item| item.code() == code)
    }

    /// Find the first item with the given code, mutably.
    pub fn find_mut(&mut self, code: &str) -> Option<&mut Item<'a>> {
        self.items.iter_mut().find(|item| item.code() == code)
    }

    /// Restore every item's discounted price to its base price.
    pub fn reset_discounts(&mut self) {
        self.items.iter_mut().for_each(Item::reset_discount);
    }

    /// Capture the current items so they can be restored later.
    pub fn snapshot(&self) -> BasketSnapshot<'a> {
        BasketSnapshot {
            items: self.items.clone(),
        }
    }

    /// Replace the basket contents with a previously captured snapshot.
    pub fn restore(&mut self, snapshot: &BasketSnapshot<'a>) {
        self.items.clone_from(&snapshot.items);
    }

    /// Calculate the subtotal of the basket (sum of base prices).
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if there was a money arithmetic or currency mismatch error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        total_price(&self.items, self.currency)
    }

    /// Calculate the total of the basket (sum of discounted prices).
    ///
    /// # Errors
    ///
    /// Returns a `TotalPriceError` if there was a money arithmetic or currency mismatch error.
    pub fn total(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        total_discounted_price(&self.items, self.currency)
    }

    /// The cheapest item by base price, if any.
    pub fn cheapest_item(&self) -> Option<&Item<'a>> {
        items::cheapest_item(&self.items)
    }

    /// The most expensive item by base price, if any.
    pub fn most_expensive_item(&self) -> Option<&Item<'a>> {
        items::most_expensive_item(&self.items)
    }

    /// Up to `n` items, cheapest first.
    pub fn n_cheapest_items(&self, n: usize) -> Vec<&Item<'a>> {
        items::n_cheapest_items(&self.items, n)
    }

    /// Up to `n` items, most expensive first.
    pub fn n_most_expensive_items(&self, n: usize) -> Vec<&Item<'a>> {
        items::n_most_expensive_items(&self.items, n)
    }

    /// Get the number of items in the basket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the basket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the basket.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

fn check_currency(
    idx: usize,
    item: &Item<'_>,
    currency: &'static Currency,
) -> Result<(), BasketError> {
    let item_currency = item.base_price().currency();

    if item_currency == currency {
        Ok(())
    } else {
        Err(BasketError::CurrencyMismatch(
            idx,
            item_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ))
    }
}
