//! Promotion Fixtures

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, items::parse_price},
    promotions::{
        BoxedPromotion, PromotionKey, PromotionMeta, promotion,
        types::{
            BuyTwoGetThirdFreePromotion, FreeGiftPromotion, OneTimeCouponPromotion,
            OrderValuePercentageDiscount,
        },
    },
};

/// Promotion entry from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct PromotionEntry {
    /// Identifier used to look the promotion up
    pub id: String,

    /// Display name
    pub name: String,

    /// Promotion configuration
    #[serde(flatten)]
    pub config: PromotionFixture,
}

impl PromotionEntry {
    /// Metadata for this promotion
    pub fn meta(&self) -> PromotionMeta {
        PromotionMeta {
            name: self.name.clone(),
        }
    }
}

/// Promotion configuration from YAML
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromotionFixture {
    /// Percentage off every item above an order value
    OrderValuePercentage {
        /// Order value the subtotal must exceed, e.g. "300.00 GBP"
        threshold: String,

        /// Discount, e.g. "5%"
        percent: String,
    },

    /// Cheapest third of the items free
    BuyTwoGetThirdFree,

    /// Free gift item at an order value
    FreeGift {
        /// Order value the subtotal must reach, e.g. "200.00 GBP"
        threshold: String,

        /// Name of the gift item
        gift: String,
    },

    /// Single-use percentage off one item
    OneTimeCoupon {
        /// Code of the discounted item
        item: String,

        /// Discount, e.g. "30%"
        percent: String,
    },
}

impl PromotionFixture {
    /// Currency of the configured threshold, if the promotion has one
    ///
    /// # Errors
    ///
    /// Returns an error if the threshold price cannot be parsed.
    pub fn currency(&self) -> Result<Option<&'static Currency>, FixtureError> {
        match self {
            PromotionFixture::OrderValuePercentage { threshold, .. }
            | PromotionFixture::FreeGift { threshold, .. } => {
                Ok(Some(parse_price(threshold)?.1))
            }
            PromotionFixture::BuyTwoGetThirdFree | PromotionFixture::OneTimeCoupon { .. } => {
                Ok(None)
            }
        }
    }

    /// Build a fresh promotion instance
    ///
    /// # Errors
    ///
    /// Returns an error if a price or percentage is malformed or the promotion rejects its
    /// configuration.
    pub fn try_into_promotion(
        &self,
        key: PromotionKey,
    ) -> Result<BoxedPromotion<'static>, FixtureError> {
        let promotion = match self {
            PromotionFixture::OrderValuePercentage { threshold, percent } => {
                promotion(OrderValuePercentageDiscount::new(
                    key,
                    parse_threshold(threshold)?,
                    parse_percentage(percent)?,
                )?)
            }
            PromotionFixture::BuyTwoGetThirdFree => {
                promotion(BuyTwoGetThirdFreePromotion::new(key))
            }
            PromotionFixture::FreeGift { threshold, gift } => promotion(FreeGiftPromotion::new(
                key,
                parse_threshold(threshold)?,
                gift.as_str(),
            )?),
            PromotionFixture::OneTimeCoupon { item, percent } => promotion(
                OneTimeCouponPromotion::new(key, item.as_str(), parse_percentage(percent)?)?,
            ),
        };

        Ok(promotion)
    }
}

fn parse_threshold(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string is not a number, optionally followed by `%`.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let (number, scale) = match trimmed.strip_suffix('%') {
        Some(percent_str) => (percent_str.trim(), 100.0),
        None => (trimmed, 1.0),
    };

    let value = number
        .parse::<f64>()
        .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    Ok(Percentage::from(value / scale))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::promotions::PromotionState;

    use super::*;

    #[test]
    fn promotion_fixture_rejects_unknown_type() {
        let yaml = "id: x\nname: Test\ntype: unknown_promotion\n";
        let result: Result<PromotionEntry, _> = serde_norway::from_str(yaml);

        assert!(result.is_err());
    }

    #[test]
    fn promotion_entry_parses_flattened_config() -> TestResult {
        let yaml = "id: coupon\nname: 30% off P2\ntype: one_time_coupon\nitem: P2\npercent: 30%\n";
        let entry: PromotionEntry = serde_norway::from_str(yaml)?;

        assert_eq!(entry.id, "coupon");
        assert_eq!(entry.meta().name, "30% off P2");
        assert!(matches!(
            entry.config,
            PromotionFixture::OneTimeCoupon { ref item, .. } if item == "P2"
        ));

        let promotion = entry.config.try_into_promotion(PromotionKey::default())?;

        assert_eq!(promotion.state(), PromotionState::Fresh);

        Ok(())
    }

    #[test]
    fn promotion_fixture_reports_threshold_currency() -> TestResult {
        let gift = PromotionFixture::FreeGift {
            threshold: "200.00 GBP".to_string(),
            gift: "Mug".to_string(),
        };

        assert_eq!(gift.currency()?, Some(GBP));
        assert_eq!(PromotionFixture::BuyTwoGetThirdFree.currency()?, None);

        Ok(())
    }

    #[test]
    fn promotion_fixture_rejects_invalid_percentage() {
        let fixture = PromotionFixture::OrderValuePercentage {
            threshold: "300.00 GBP".to_string(),
            percent: "150%".to_string(),
        };

        assert!(matches!(
            fixture.try_into_promotion(PromotionKey::default()),
            Err(FixtureError::Promotion(_))
        ));
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(parse_percentage("15%")?, Percentage::from(0.15));
        assert_eq!(parse_percentage("0.15")?, Percentage::from(0.15));
        assert_eq!(parse_percentage(" 100% ")?, Percentage::from(1.0));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_garbage() {
        assert!(matches!(
            parse_percentage("lots"),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }
}
