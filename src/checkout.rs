//! Checkout
//!
//! A [`Checkout`] accumulates scanned items for one transaction and prices them against a
//! borrowed [`PricingRuleSet`]. Scanning never fails; unknown items surface when a total is
//! requested.

use std::{fmt, hash::Hash};

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, PricingRuleSet, Quantity},
    receipt::{Receipt, ReceiptError},
    sku::Sku,
};

pub mod counts;

pub use counts::ItemCounts;

/// A single checkout transaction.
#[derive(Debug)]
pub struct Checkout<'r, 'a, K = Sku>
where
    K: Eq + Hash,
{
    rules: &'r PricingRuleSet<'a, K>,
    counts: ItemCounts<K>,
}

impl<'r, 'a, K> Checkout<'r, 'a, K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    /// Start a new checkout priced by `rules`.
    pub fn new(rules: &'r PricingRuleSet<'a, K>) -> Self {
        Checkout {
            rules,
            counts: ItemCounts::new(),
        }
    }

    /// Scan one unit of `item`.
    pub fn scan(&mut self, item: impl Into<K>) {
        self.counts.increment(item.into());
    }

    /// Scan every item in `items`, in order.
    pub fn scan_all<I>(&mut self, items: I)
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        for item in items {
            self.scan(item);
        }
    }

    /// Calculate the total price of everything scanned so far.
    ///
    /// The total is recomputed from the current counts on every call.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a scanned item has no pricing rules, or if money arithmetic
    /// overflows.
    pub fn total(&self) -> Result<Money<'a, Currency>, PricingError> {
        self.rules.total(&self.counts)
    }

    /// Build an itemised receipt for everything scanned so far.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if any line cannot be priced.
    pub fn receipt(&self) -> Result<Receipt<'a, K>, ReceiptError>
    where
        K: Ord,
    {
        Receipt::from_counts(self.rules, &self.counts)
    }

    /// Return the number of units of `item` scanned so far.
    pub fn count(&self, item: &K) -> Quantity {
        self.counts.get(item)
    }

    /// Return the per-item counts scanned so far.
    pub fn counts(&self) -> &ItemCounts<K> {
        &self.counts
    }

    /// Check whether nothing has been scanned.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Return the rule set this checkout is priced by.
    pub fn rules(&self) -> &'r PricingRuleSet<'a, K> {
        self.rules
    }
}
