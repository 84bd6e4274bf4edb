//! Pricing
//!
//! A [`PricingRuleSet`] holds the validated tiers for every item and prices quantities with a
//! greedy, largest-tier-first decomposition. Every item is guaranteed a unit price tier, which
//! absorbs whatever the larger tiers leave over, so the walk is exact and never backtracks.

use std::{fmt, hash::Hash};

use rusty_money::{Money, MoneyError, iso::Currency};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    prices::{Amount, zero},
    rules::{PricingRule, ValidationError},
    sku::Sku,
};

/// A count of units of an item.
pub type Quantity = u32;

/// Tiers for a single item, largest quantity first.
pub type Tiers<'a, K> = SmallVec<[PricingRule<'a, K>; 4]>;

/// Errors that can occur while pricing items.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// No pricing rules are registered for the item.
    #[error("no pricing rules for item {0}")]
    UnknownItem(String),

    /// A subtotal did not fit in minor units.
    #[error("price overflowed the minor unit range")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// One tier as applied while pricing an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierApplication<'a> {
    /// Units per application of the tier
    pub quantity: Quantity,

    /// Price per application of the tier
    pub price: Money<'a, Currency>,

    /// How many times the tier was applied
    pub times: Quantity,

    /// `price * times`
    pub subtotal: Money<'a, Currency>,
}

/// How a quantity of one item was priced.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemBreakdown<'a, K = Sku> {
    /// The item priced
    pub item: K,

    /// Number of units priced
    pub quantity: Quantity,

    /// Tiers applied at least once, largest first
    pub applications: SmallVec<[TierApplication<'a>; 4]>,

    /// Sum of all tier subtotals
    pub subtotal: Money<'a, Currency>,
}

/// The set of pricing rules in effect.
///
/// Rules are grouped per item and sorted by `(quantity, price)`, descending. Construction checks
/// that every item has a unit price and that prices never drop as tier quantities grow; nothing
/// is re-checked afterwards.
#[derive(Debug, Clone)]
pub struct PricingRuleSet<'a, K = Sku>
where
    K: Eq + Hash,
{
    currency: &'static Currency,
    rules: FxHashMap<K, Tiers<'a, K>>,
}

impl<'a, K> PricingRuleSet<'a, K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    /// Create a rule set from a list of rules priced in `currency`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::CurrencyMismatch`]: a rule is priced in another currency.
    /// - [`ValidationError::NonMonotonicPrice`]: a larger tier is cheaper than a smaller one.
    /// - [`ValidationError::MissingUnitPrice`]: an item has no `quantity == 1` tier.
    pub fn new(
        currency: &'static Currency,
        rules: impl IntoIterator<Item = PricingRule<'a, K>>,
    ) -> Result<Self, ValidationError> {
        let mut grouped: FxHashMap<K, Tiers<'a, K>> = FxHashMap::default();

        for rule in rules {
            let rule_currency = rule.price().currency();

            if rule_currency != currency {
                return Err(ValidationError::CurrencyMismatch {
                    item: rule.item().to_string(),
                    expected: currency.iso_alpha_code,
                    found: rule_currency.iso_alpha_code,
                });
            }

            grouped.entry(rule.item().clone()).or_default().push(rule);
        }

        for (item, tiers) in &mut grouped {
            tiers.sort_by(|a, b| {
                b.quantity()
                    .cmp(&a.quantity())
                    .then_with(|| b.price().to_minor_units().cmp(&a.price().to_minor_units()))
            });

            validate_tiers(item, tiers)?;
        }

        debug!(
            currency = currency.iso_alpha_code,
            items = grouped.len(),
            tiers = grouped.values().map(SmallVec::len).sum::<usize>(),
            "built pricing rule set"
        );

        Ok(Self {
            currency,
            rules: grouped,
        })
    }

    /// Create a rule set from a table of `(item, [(quantity, amount)])` tiers.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any amount is inexact or negative, any quantity is zero,
    /// or the resulting rules fail [`PricingRuleSet::new`].
    pub fn from_tiers<I, J, T, A>(
        currency: &'static Currency,
        table: I,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (J, T)>,
        J: Into<K>,
        T: IntoIterator<Item = (Quantity, A)>,
        A: Into<Amount>,
    {
        let mut rules = Vec::new();

        for (item, tiers) in table {
            let item: K = item.into();

            for (quantity, amount) in tiers {
                rules.push(PricingRule::with_amount(
                    item.clone(),
                    quantity,
                    amount,
                    currency,
                )?);
            }
        }

        Self::new(currency, rules)
    }

    /// Calculate the price of `quantity` units of `item`.
    ///
    /// # Errors
    ///
    /// - [`PricingError::UnknownItem`]: `item` has no rules, even when `quantity` is zero.
    /// - [`PricingError::Overflow`]: a subtotal does not fit in minor units.
    pub fn total_for_item(
        &self,
        item: &K,
        quantity: Quantity,
    ) -> Result<Money<'a, Currency>, PricingError> {
        Ok(self.breakdown_for_item(item, quantity)?.subtotal)
    }

    /// Price `quantity` units of `item`, recording every tier that was applied.
    ///
    /// # Errors
    ///
    /// See [`PricingRuleSet::total_for_item`].
    pub fn breakdown_for_item(
        &self,
        item: &K,
        quantity: Quantity,
    ) -> Result<ItemBreakdown<'a, K>, PricingError> {
        let tiers = self
            .rules
            .get(item)
            .ok_or_else(|| PricingError::UnknownItem(item.to_string()))?;

        let mut applications = SmallVec::new();
        let mut subtotal = zero(self.currency);
        let mut remaining = quantity;

        for rule in tiers {
            let (tier_subtotal, remainder) = rule.apply(remaining)?;
            let times = (remaining - remainder) / rule.quantity();

            if times > 0 {
                applications.push(TierApplication {
                    quantity: rule.quantity(),
                    price: *rule.price(),
                    times,
                    subtotal: tier_subtotal,
                });

                subtotal = subtotal.add(tier_subtotal)?;
            }

            remaining = remainder;
        }

        debug_assert_eq!(remaining, 0, "unit price tier must absorb the remainder");

        Ok(ItemBreakdown {
            item: item.clone(),
            quantity,
            applications,
            subtotal,
        })
    }

    /// Calculate the total price of a cart of `(item, quantity)` entries.
    ///
    /// Entries with a quantity of zero are skipped before the item is looked up, exactly as if
    /// they had been left out of the cart.
    ///
    /// # Errors
    ///
    /// See [`PricingRuleSet::total_for_item`].
    pub fn total<'c, I>(&self, cart: I) -> Result<Money<'a, Currency>, PricingError>
    where
        I: IntoIterator<Item = (&'c K, &'c Quantity)>,
        K: 'c,
    {
        cart.into_iter()
            .filter(|(_item, quantity)| **quantity > 0)
            .try_fold(zero(self.currency), |total, (item, quantity)| {
                Ok(total.add(self.total_for_item(item, *quantity)?)?)
            })
    }

    /// Return the currency all rules are priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Return the tiers for `item`, largest quantity first.
    pub fn rules_for(&self, item: &K) -> Option<&[PricingRule<'a, K>]> {
        self.rules.get(item).map(SmallVec::as_slice)
    }

    /// Check whether `item` has any rules.
    pub fn contains(&self, item: &K) -> bool {
        self.rules.contains_key(item)
    }

    /// Iterate over every item with rules.
    pub fn items(&self) -> impl Iterator<Item = &K> {
        self.rules.keys()
    }

    /// Number of items with rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the rule set has no items.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Check the sorted tiers of one item.
fn validate_tiers<K: fmt::Display>(
    item: &K,
    tiers: &[PricingRule<'_, K>],
) -> Result<(), ValidationError> {
    let price_drops = tiers.windows(2).any(|pair| match pair {
        [larger, smaller] => larger.price().to_minor_units() < smaller.price().to_minor_units(),
        _ => false,
    });

    if price_drops {
        return Err(ValidationError::NonMonotonicPrice(item.to_string()));
    }

    if !tiers.last().is_some_and(PricingRule::is_unit_price) {
        return Err(ValidationError::MissingUnitPrice(item.to_string()));
    }

    Ok(())
}
