//! Cart
//!
//! A cart owns a basket and its active promotions, and prices the basket on demand. After a
//! successful [`Cart::calculate_total`], every item's discount price reflects the cheapest
//! promotion order found and [`Cart::last_result`] describes it.

use rusty_money::{Money, iso::Currency};

use crate::{
    basket::{Basket, BasketError},
    items::{Item, SortOrder},
    pricing::TotalPriceError,
    promotions::{BoxedPromotion, PromotionKey},
    solvers::{Solver, SolverError, SolverResult, permutation::PermutationSolver},
};

/// A basket together with the promotions that price it
#[derive(Debug)]
pub struct Cart<'a> {
    basket: Basket<'a>,
    promotions: Vec<BoxedPromotion<'a>>,
    sort_order: SortOrder,
    last_result: Option<SolverResult<'a>>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart priced in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_basket(Basket::new(currency))
    }

    /// Create a cart around an existing basket.
    pub fn with_basket(basket: Basket<'a>) -> Self {
        Self {
            basket,
            promotions: Vec::new(),
            sort_order: SortOrder::default(),
            last_result: None,
        }
    }

    /// Add an item to the end of the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`BasketError`] if the item's currency differs from the cart's.
    pub fn add_item(&mut self, item: Item<'a>) -> Result<(), BasketError> {
        self.basket.add(item)?;
        self.last_result = None;

        Ok(())
    }

    /// Remove the first item with the given code.
    pub fn remove_item(&mut self, code: &str) -> Option<Item<'a>> {
        let removed = self.basket.remove(code);

        if removed.is_some() {
            self.last_result = None;
        }

        removed
    }

    /// The items in the cart, in insertion order.
    pub fn items(&self) -> &[Item<'a>] {
        self.basket.items()
    }

    /// The underlying basket.
    pub fn basket(&self) -> &Basket<'a> {
        &self.basket
    }

    /// The items in presentation order. The cart itself is not reordered.
    pub fn sorted_items(&self) -> Vec<&Item<'a>> {
        let mut items: Vec<&Item<'a>> = self.basket.iter().collect();

        self.sort_order.sort(&mut items);

        items
    }

    /// Change the presentation order.
    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.sort_order = sort_order;
    }

    /// The current presentation order.
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Register a promotion. Registration order is the starting point of the order search.
    pub fn add_promotion(&mut self, promotion: BoxedPromotion<'a>) {
        self.promotions.push(promotion);
        self.last_result = None;
    }

    /// Unregister the promotion with the given key.
    pub fn remove_promotion(&mut self, key: PromotionKey) -> Option<BoxedPromotion<'a>> {
        let idx = self
            .promotions
            .iter()
            .position(|promotion| promotion.key() == key)?;

        self.last_result = None;

        Some(self.promotions.remove(idx))
    }

    /// The registered promotions, in registration order.
    pub fn promotions(&self) -> &[BoxedPromotion<'a>] {
        &self.promotions
    }

    /// Unregister every promotion.
    pub fn clear_promotions(&mut self) {
        self.promotions.clear();
        self.last_result = None;
    }

    /// Price the cart using the cheapest promotion order.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if any promotion fails to apply.
    pub fn calculate_total(&mut self) -> Result<Money<'a, Currency>, SolverError> {
        self.calculate_total_with::<PermutationSolver>()
    }

    /// Price the cart with a specific solver.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if any promotion fails to apply.
    #[tracing::instrument(
        name = "cart.calculate_total",
        skip_all,
        fields(items = self.basket.len(), promotions = self.promotions.len())
    )]
    pub fn calculate_total_with<S: Solver>(&mut self) -> Result<Money<'a, Currency>, SolverError> {
        self.last_result = None;

        let result = S::solve(&mut self.promotions, &mut self.basket)?;
        let total = result.total;

        self.last_result = Some(result);

        Ok(total)
    }

    /// The sum of base prices, ignoring promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if an item's currency differs from the cart's.
    pub fn total_before_promotions(&self) -> Result<Money<'a, Currency>, TotalPriceError> {
        self.basket.subtotal()
    }

    /// The outcome of the most recent pricing, cleared whenever the cart changes.
    pub fn last_result(&self) -> Option<&SolverResult<'a>> {
        self.last_result.as_ref()
    }

    /// The cheapest item by base price, if any.
    pub fn cheapest_item(&self) -> Option<&Item<'a>> {
        self.basket.cheapest_item()
    }

    /// The most expensive item by base price, if any.
    pub fn most_expensive_item(&self) -> Option<&Item<'a>> {
        self.basket.most_expensive_item()
    }

    /// Up to `n` items, cheapest first.
    pub fn n_cheapest_items(&self, n: usize) -> Vec<&Item<'a>> {
        self.basket.n_cheapest_items(n)
    }

    /// Up to `n` items, most expensive first.
    pub fn n_most_expensive_items(&self, n: usize) -> Vec<&Item<'a>> {
        self.basket.n_most_expensive_items(n)
    }
}
