//! Receipt

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::SlotMap;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    items::Item,
    pricing::TotalPriceError,
    promotions::{PromotionKey, PromotionMeta},
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating total price from basket items.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The cart has changed, or was never priced, since the last total calculation.
    #[error("cart has not been priced")]
    NotPriced,

    /// IO error
    #[error("IO error")]
    IO,
}

/// A single priced item on a receipt.
#[derive(Debug, Clone)]
pub struct ReceiptLine<'a> {
    /// Item code
    pub code: String,

    /// Item name
    pub name: String,

    /// Price before promotions
    pub base_price: Money<'a, Currency>,

    /// Price paid
    pub discount_price: Money<'a, Currency>,

    /// Whether the item was added by a gift promotion
    pub gift: bool,
}

impl<'a> From<&Item<'a>> for ReceiptLine<'a> {
    fn from(item: &Item<'a>) -> Self {
        Self {
            code: item.code().to_string(),
            name: item.name().to_string(),
            base_price: *item.base_price(),
            discount_price: *item.discount_price(),
            gift: item.is_gift(),
        }
    }
}

/// Final receipt for a priced cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Lines in presentation order
    lines: Vec<ReceiptLine<'a>>,

    /// Promotions in the order they were applied
    promotion_order: SmallVec<[PromotionKey; 8]>,

    /// Total cost before any promotion applications
    subtotal: Money<'a, Currency>,

    /// Total amount paid for all items after any promotion applications
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt with the given details.
    #[must_use]
    pub fn new(
        lines: Vec<ReceiptLine<'a>>,
        promotion_order: SmallVec<[PromotionKey; 8]>,
        subtotal: Money<'a, Currency>,
        total: Money<'a, Currency>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            lines,
            promotion_order,
            subtotal,
            total,
            currency,
        }
    }

    /// Build a receipt from a cart priced by [`Cart::calculate_total`].
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotPriced`] if the cart has no current pricing, or a
    /// [`ReceiptError`] if the subtotal cannot be calculated.
    pub fn from_cart(cart: &Cart<'a>) -> Result<Self, ReceiptError> {
        let result = cart.last_result().ok_or(ReceiptError::NotPriced)?;

        let lines = cart
            .sorted_items()
            .into_iter()
            .map(ReceiptLine::from)
            .collect();

        Ok(Self::new(
            lines,
            result.order.clone(),
            cart.total_before_promotions()?,
            result.total,
            cart.basket().currency(),
        ))
    }

    /// Lines in presentation order
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Promotions in the order they were applied
    pub fn promotion_order(&self) -> &[PromotionKey] {
        &self.promotion_order
    }

    /// Total cost before any promotion applications
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount paid for all items
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency used for all monetary values
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by applying promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Calculates the savings made by applying the promotions as a percentage
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        Ok(Percentage::from(
            Decimal::from(savings_minor) / Decimal::from(subtotal_minor),
        ))
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        promotion_meta: &SlotMap<PromotionKey, PromotionMeta>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();
        let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = SmallVec::new();

        builder.push_record(["", "Item", "Code", "Base Price", "Discounted Price", "Savings"]);

        for (idx, line) in self.lines.iter().enumerate() {
            let row = idx + 1;
            let savings = line.base_price.sub(line.discount_price)?;

            let name = if line.gift {
                format!("{} (gift)", line.name)
            } else {
                line.name.clone()
            };

            let (discounted, savings) = if line.discount_price == line.base_price {
                (String::new(), String::new())
            } else {
                color_ops.push((row, 4, Color::FG_GREEN));

                (format!("{}", line.discount_price), format!("-{savings}"))
            };

            builder.push_record([
                format!("#{row:<3}"),
                name,
                line.code.clone(),
                format!("{}", line.base_price),
                discounted,
                savings,
            ]);

            color_ops.push((row, 0, color_dark_grey()));
        }

        write_receipt_table(&mut out, builder, color_ops)?;

        self.write_summary(&mut out, promotion_meta)
    }

    fn write_summary(
        &self,
        out: &mut impl io::Write,
        promotion_meta: &SlotMap<PromotionKey, PromotionMeta>,
    ) -> Result<(), ReceiptError> {
        let savings = self.savings()?;
        let savings_percent_points =
            percent_points_from_fractional_percentage(self.savings_percent()?);

        let subtotal_label = " Subtotal:";
        let total_label = " \x1b[1mTotal:\x1b[0m";
        let savings_label = " Savings:";

        let subtotal_val = format!("{}  ", self.subtotal);
        let total_val = format!("{}  ", self.total);
        let savings_val = format!("({savings_percent_points:.2}%) {savings}  ");

        let label_width = visible_width(subtotal_label)
            .max(visible_width(total_label))
            .max(visible_width(savings_label));

        let value_width = subtotal_val
            .len()
            .max(total_val.len())
            .max(savings_val.len());

        write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;

        write_summary_line(
            out,
            total_label,
            &format!("\x1b[1m{total_val}\x1b[0m"),
            label_width,
            value_width,
        )?;

        write_summary_line(out, savings_label, &savings_val, label_width, value_width)?;

        if !self.promotion_order.is_empty() {
            let names: Vec<&str> = self
                .promotion_order
                .iter()
                .map(|key| {
                    promotion_meta
                        .get(*key)
                        .map_or("<unknown>", |meta| meta.name.as_str())
                })
                .collect();

            writeln!(out, "\n Applied: {}", names.join(" → "))
                .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in ANSI dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char != in_run {
            _ = out.write_str(if box_char { "\x1b[90m" } else { "\x1b[0m" });
            in_run = box_char;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            in_escape = !ch.is_ascii_alphabetic();
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
