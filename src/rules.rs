//! Pricing Rules
//!
//! A [`PricingRule`] is a single "buy N for Y" tier. A flat unit price is simply the tier with
//! `quantity == 1`.

use std::num::NonZeroU32;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::trace;

use crate::{
    pricing::{PricingError, Quantity},
    prices::Amount,
    sku::Sku,
};

/// Errors raised while building pricing rules or rule sets.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// The price was given as a binary floating point number.
    #[error("inexact price {0}: prices must be integers or exact decimals")]
    InexactPrice(f64),

    /// The price has more fractional digits than the currency's minor unit.
    #[error("price {amount} is more precise than the minor unit of {currency}")]
    SubMinorPrecision {
        /// The offending amount, as written
        amount: String,
        /// ISO code of the currency
        currency: &'static str,
    },

    /// The price does not fit in minor units.
    #[error("price {0} is out of range")]
    PriceOutOfRange(String),

    /// The price (in minor units) is below zero.
    #[error("negative price {0}")]
    NegativePrice(i64),

    /// The tier quantity is zero.
    #[error("invalid quantity {quantity} for item {item}")]
    InvalidQuantity {
        /// Item the rule was for
        item: String,
        /// The rejected quantity
        quantity: Quantity,
    },

    /// A rule is priced in a different currency to the rule set.
    #[error("item {item} is priced in {found}, but the rule set uses {expected}")]
    CurrencyMismatch {
        /// Item the rule was for
        item: String,
        /// Rule set currency
        expected: &'static str,
        /// Rule currency
        found: &'static str,
    },

    /// A larger tier is priced below a smaller one.
    #[error("non-monotonic price for item {0}")]
    NonMonotonicPrice(String),

    /// An item has tiers but no `quantity == 1` tier.
    #[error("missing unit price for item {0}")]
    MissingUnitPrice(String),
}

/// Pricing rule for "buy `quantity` units of `item` for `price`".
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRule<'a, K = Sku> {
    item: K,
    quantity: NonZeroU32,
    price: Money<'a, Currency>,
}

impl<'a, K: ToString> PricingRule<'a, K> {
    /// Create a new tier rule.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidQuantity`]: `quantity` is zero.
    /// - [`ValidationError::NegativePrice`]: `price` is below zero.
    pub fn new(
        item: impl Into<K>,
        quantity: Quantity,
        price: Money<'a, Currency>,
    ) -> Result<Self, ValidationError> {
        let item = item.into();

        let Some(quantity) = NonZeroU32::new(quantity) else {
            return Err(ValidationError::InvalidQuantity {
                item: item.to_string(),
                quantity,
            });
        };

        let minor = price.to_minor_units();
        if minor < 0 {
            return Err(ValidationError::NegativePrice(minor));
        }

        Ok(Self {
            item,
            quantity,
            price,
        })
    }

    /// Create a new tier rule from an untyped amount.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Amount::to_money`] or [`PricingRule::new`].
    pub fn with_amount(
        item: impl Into<K>,
        quantity: Quantity,
        amount: impl Into<Amount>,
        currency: &'static Currency,
    ) -> Result<Self, ValidationError> {
        let price = amount.into().to_money(currency)?;

        Self::new(item, quantity, price)
    }

    /// Create a unit price rule (the tier with `quantity == 1`).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NegativePrice`] if `price` is below zero.
    pub fn unit_price(
        item: impl Into<K>,
        price: Money<'a, Currency>,
    ) -> Result<Self, ValidationError> {
        Self::new(item, 1, price)
    }
}

impl<'a, K> PricingRule<'a, K> {
    /// Return the item this rule applies to.
    pub fn item(&self) -> &K {
        &self.item
    }

    /// Return the number of units in this tier.
    pub fn quantity(&self) -> Quantity {
        self.quantity.get()
    }

    /// Return the price of one application of this tier.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Whether this is the unit price tier.
    pub fn is_unit_price(&self) -> bool {
        self.quantity.get() == 1
    }

    /// Apply this rule as often as possible to `count` units.
    ///
    /// Returns the subtotal for the units this tier covers and the number of units left over.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit in minor units.
    pub fn apply(&self, count: Quantity) -> Result<(Money<'a, Currency>, Quantity), PricingError> {
        let times = count / self.quantity;
        let remainder = count % self.quantity;

        let subtotal = self
            .price
            .to_minor_units()
            .checked_mul(i64::from(times))
            .ok_or(PricingError::Overflow)?;

        trace!(
            quantity = self.quantity.get(),
            times,
            remainder,
            subtotal,
            "applied tier"
        );

        Ok((Money::from_minor(subtotal, self.price.currency()), remainder))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn apply_divides_count_into_tiers() -> TestResult {
        let rule: PricingRule<'_> = PricingRule::new("A", 3, Money::from_minor(130, GBP))?;

        assert_eq!(rule.apply(7)?, (Money::from_minor(260, GBP), 1));
        assert_eq!(rule.apply(2)?, (Money::from_minor(0, GBP), 2));
        assert_eq!(rule.apply(0)?, (Money::from_minor(0, GBP), 0));

        Ok(())
    }

    #[test]
    fn unit_price_has_quantity_one() -> TestResult {
        let rule: PricingRule<'_> = PricingRule::unit_price("C", Money::from_minor(20, USD))?;

        assert!(rule.is_unit_price());
        assert_eq!(rule.quantity(), 1);
        assert_eq!(rule.item(), &Sku::from("C"));
        assert_eq!(rule.apply(4)?, (Money::from_minor(80, USD), 0));

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result: Result<PricingRule<'_>, _> =
            PricingRule::new("A", 0, Money::from_minor(10, GBP));

        assert_eq!(
            result,
            Err(ValidationError::InvalidQuantity {
                item: "A".to_string(),
                quantity: 0,
            })
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        let result: Result<PricingRule<'_>, _> =
            PricingRule::new("A", 1, Money::from_minor(-5, GBP));

        assert_eq!(result, Err(ValidationError::NegativePrice(-5)));
    }

    #[test]
    fn float_amount_is_rejected() {
        let result: Result<PricingRule<'_>, _> = PricingRule::with_amount("A", 1, 0.5, GBP);

        assert!(matches!(result, Err(ValidationError::InexactPrice(_))));
    }

    #[test]
    fn apply_reports_overflow() -> TestResult {
        let rule: PricingRule<'_> = PricingRule::new("A", 1, Money::from_minor(i64::MAX, GBP))?;

        assert_eq!(rule.apply(2), Err(PricingError::Overflow));

        Ok(())
    }
}
