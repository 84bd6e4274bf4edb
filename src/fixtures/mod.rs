//! Fixtures
//!
//! Pricing rule tables described in YAML, loaded from `<base path>/rules/<name>.yml`.

use std::{fs, path::PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{pricing::PricingRuleSet, rules::ValidationError};

pub mod rules;

pub use rules::{PriceFixture, RulesFixture, TierFixture};

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

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// A price names a different currency to its table
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The rules in the table are invalid
    #[error("Invalid pricing rules: {0}")]
    Validation(#[from] ValidationError),
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Fixture {
    /// Create a new fixture loader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load the named rule table and build its rule set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the rules are invalid.
    pub fn rule_set<'a>(&self, name: &str) -> Result<PricingRuleSet<'a>, FixtureError> {
        let file_path = self.base_path.join("rules").join(format!("{name}.yml"));

        debug!(path = %file_path.display(), "loading rule table");

        let contents = fs::read_to_string(&file_path)?;

        rule_set_from_yaml(&contents)
    }

    /// Load the named rule table from the default base path.
    ///
    /// # Errors
    ///
    /// See [`Fixture::rule_set`].
    pub fn from_set<'a>(name: &str) -> Result<PricingRuleSet<'a>, FixtureError> {
        Self::new().rule_set(name)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a rule set from a YAML rule table.
///
/// # Errors
///
/// Returns an error if the YAML cannot be parsed or the rules are invalid.
pub fn rule_set_from_yaml<'a>(contents: &str) -> Result<PricingRuleSet<'a>, FixtureError> {
    let fixture: RulesFixture = serde_norway::from_str(contents)?;

    fixture.into_rule_set()
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::sku::Sku;

    use super::*;

    #[test]
    fn parses_mixed_price_formats() -> TestResult {
        let rules = rule_set_from_yaml(
            r#"
currency: GBP
rules:
  A:
    - { quantity: 1, price: 50 }
    - { quantity: 3, price: "1.30" }
"#,
        )?;

        assert_eq!(rules.currency(), GBP);
        assert_eq!(
            rules.total_for_item(&Sku::from("A"), 4)?,
            Money::from_minor(180, GBP)
        );

        Ok(())
    }

    #[test]
    fn float_prices_are_rejected() {
        let result = rule_set_from_yaml(
            r"
currency: GBP
rules:
  A:
    - { quantity: 1, price: 0.5 }
",
        );

        assert!(matches!(
            result,
            Err(FixtureError::Validation(ValidationError::InexactPrice(_)))
        ));
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let result = rule_set_from_yaml("currency: XYZ\nrules: {}\n");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "XYZ"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Fixture::with_base_path("./does-not-exist").rule_set("example");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
