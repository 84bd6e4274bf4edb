//! Item Counts

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::{pricing::Quantity, sku::Sku};

/// Running per-item unit counts for a single transaction.
///
/// Looking up an unseen item yields zero without inserting it; incrementing an unseen item
/// inserts it at zero first.
#[derive(Debug, Clone)]
pub struct ItemCounts<K = Sku> {
    counts: FxHashMap<K, Quantity>,
}

impl<K: Eq + Hash> ItemCounts<K> {
    /// Create an empty set of counts.
    pub fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
        }
    }

    /// Return the count for `item`, or zero if it has never been incremented.
    pub fn get(&self, item: &K) -> Quantity {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Add one to the count for `item`.
    ///
    /// Counts saturate at [`Quantity::MAX`].
    pub fn increment(&mut self, item: K) {
        let count = self.counts.entry(item).or_insert(0);

        *count = count.saturating_add(1);
    }

    /// Number of distinct items counted.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check whether nothing has been counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of units across all items.
    pub fn units(&self) -> u64 {
        self.counts.values().map(|&count| u64::from(count)).sum()
    }

    /// Iterate over `(item, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Quantity)> {
        self.counts.iter()
    }
}

impl<K: Eq + Hash> Default for ItemCounts<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c, K> IntoIterator for &'c ItemCounts<K> {
    type Item = (&'c K, &'c Quantity);
    type IntoIter = std::collections::hash_map::Iter<'c, K, Quantity>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl<K: Eq + Hash> FromIterator<K> for ItemCounts<K> {
    fn from_iter<I: IntoIterator<Item = K>>(items: I) -> Self {
        let mut counts = Self::new();

        for item in items {
            counts.increment(item);
        }

        counts
    }
}
