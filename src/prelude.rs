//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    checkout::{Checkout, ItemCounts},
    fixtures::{Fixture, FixtureError},
    prices::Amount,
    pricing::{ItemBreakdown, PricingError, PricingRuleSet, Quantity, TierApplication},
    receipt::{Receipt, ReceiptError},
    rules::{PricingRule, ValidationError},
    sku::Sku,
};
