//! Tally
//!
//! Tally prices shopping carts under per-item "buy N for Y" tiers with exact money arithmetic.
//!
//! ```
//! use rusty_money::{Money, iso::GBP};
//! use tally::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rules: PricingRuleSet<'_> = PricingRuleSet::from_tiers(
//!     GBP,
//!     [("A", vec![(1, 50), (3, 130)]), ("B", vec![(1, 30), (2, 45)])],
//! )?;
//!
//! let mut checkout = Checkout::new(&rules);
//! checkout.scan_all("ABAA".chars());
//!
//! assert_eq!(checkout.total()?, Money::from_minor(160, GBP));
//! # Ok(())
//! # }
//! ```

pub mod checkout;
pub mod fixtures;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod receipt;
pub mod rules;
pub mod sku;
