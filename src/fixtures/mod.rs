//! Fixtures
//!
//! A fixture set is a single YAML file, `<base path>/<name>.yml`, listing the items of a cart and
//! the promotions that apply to it.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    basket::{Basket, BasketError},
    cart::Cart,
    fixtures::{
        items::ItemFixture,
        promotions::{PromotionEntry, PromotionFixture},
    },
    items::Item,
    promotions::{BoxedPromotion, PromotionError, PromotionKey, PromotionMeta},
};

pub mod items;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Promotion not found
    #[error("Promotion not found: {0}")]
    PromotionNotFound(String),

    /// Promotion id used more than once
    #[error("Duplicate promotion id: {0}")]
    DuplicatePromotion(String),

    /// Currency mismatch between prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No items loaded yet
    #[error("No items loaded yet; currency unknown")]
    NoCurrency,

    /// No items loaded
    #[error("No items loaded; cannot create basket")]
    NoItems,

    /// Not enough items in fixture
    #[error("Not enough items in fixture, available: {available}, requested: {requested}")]
    NotEnoughItems {
        /// Number of items defined in the fixture
        available: usize,
        /// Number of items requested
        requested: usize,
    },

    /// Basket creation error
    #[error("Failed to create basket: {0}")]
    Basket(#[from] BasketError),

    /// Promotion configuration error
    #[error("Invalid promotion: {0}")]
    Promotion(#[from] PromotionError),
}

/// Fixture set file contents
#[derive(Debug, Deserialize)]
pub struct FixtureSet {
    /// Items, in cart order
    #[serde(default)]
    pub items: Vec<ItemFixture>,

    /// Promotions, in registration order
    #[serde(default)]
    pub promotions: Vec<PromotionEntry>,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Promotion metadata with generated keys
    promotion_meta: SlotMap<PromotionKey, PromotionMeta>,

    /// Promotion id -> `SlotMap` key mappings for lookups
    promotion_keys: FxHashMap<String, PromotionKey>,

    /// Pre-built items
    items: Vec<Item<'static>>,

    /// Promotion configurations, in registration order
    promotions: Vec<(PromotionKey, PromotionFixture)>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            promotion_meta: SlotMap::with_key(),
            promotion_keys: FxHashMap::default(),
            items: Vec::new(),
            promotions: Vec::new(),
            currency: None,
        }
    }

    /// Load a fixture set file from the base path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or its contents are invalid.
    pub fn load(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.load_str(&contents)
    }

    /// Load a fixture set from a YAML string
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, or its contents are invalid.
    pub fn load_str(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let set: FixtureSet = serde_norway::from_str(yaml)?;

        for item_fixture in set.items {
            let item = Item::try_from(item_fixture)?;

            self.check_currency(item.base_price().currency())?;
            self.items.push(item);
        }

        for entry in set.promotions {
            if self.promotion_keys.contains_key(&entry.id) {
                return Err(FixtureError::DuplicatePromotion(entry.id));
            }

            if let Some(currency) = entry.config.currency()? {
                self.check_currency(currency)?;
            }

            let key = self.promotion_meta.insert(entry.meta());

            // Validate the configuration up front.
            entry.config.try_into_promotion(key)?;

            self.promotion_keys.insert(entry.id, key);
            self.promotions.push((key, entry.config));
        }

        Ok(self)
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);

                Ok(())
            }
        }
    }

    /// Load a complete fixture set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load(name)?;

        Ok(fixture)
    }

    /// Get a promotion key by its fixture id
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion is not found.
    pub fn promotion_key(&self, id: &str) -> Result<PromotionKey, FixtureError> {
        self.promotion_keys
            .get(id)
            .copied()
            .ok_or_else(|| FixtureError::PromotionNotFound(id.to_string()))
    }

    /// Get promotion metadata by its fixture id
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion is not found.
    pub fn promotion_meta(&self, id: &str) -> Result<&PromotionMeta, FixtureError> {
        self.promotion_meta
            .get(self.promotion_key(id)?)
            .ok_or_else(|| FixtureError::PromotionNotFound(id.to_string()))
    }

    /// Get the promotion metadata `SlotMap`
    pub fn promotion_meta_map(&self) -> &SlotMap<PromotionKey, PromotionMeta> {
        &self.promotion_meta
    }

    /// Get all items
    pub fn items(&self) -> &[Item<'static>] {
        &self.items
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if nothing priced has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Create a basket from the first `n` loaded items, or all of them
    ///
    /// # Errors
    ///
    /// Returns an error if no items are loaded or too many are requested.
    pub fn basket(&self, n: Option<usize>) -> Result<Basket<'static>, FixtureError> {
        let currency = self.currency()?;

        if self.items.is_empty() {
            return Err(FixtureError::NoItems);
        }

        if let Some(n) = n
            && n > self.items.len()
        {
            return Err(FixtureError::NotEnoughItems {
                requested: n,
                available: self.items.len(),
            });
        }

        let items: Vec<Item<'static>> = self
            .items
            .iter()
            .take(n.unwrap_or(self.items.len()))
            .cloned()
            .collect();

        Ok(Basket::with_items(items, currency)?)
    }

    /// Build fresh instances of every promotion, in registration order
    ///
    /// # Errors
    ///
    /// Returns an error if a promotion configuration is invalid.
    pub fn promotions(&self) -> Result<Vec<BoxedPromotion<'static>>, FixtureError> {
        self.promotions
            .iter()
            .map(|(key, config)| config.try_into_promotion(*key))
            .collect()
    }

    /// Create a cart holding the first `n` items (or all) and every promotion
    ///
    /// # Errors
    ///
    /// Returns an error if the basket or the promotions cannot be built.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart<'static>, FixtureError> {
        let mut cart = Cart::with_basket(self.basket(n)?);

        for promotion in self.promotions()? {
            cart.add_promotion(promotion);
        }

        Ok(cart)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
