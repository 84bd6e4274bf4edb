//! Rule Table Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    prices::{Amount, currency_for_code},
    pricing::{PricingRuleSet, Quantity},
    rules::PricingRule,
    sku::Sku,
};

/// Wrapper for a rule table in YAML
#[derive(Debug, Deserialize)]
pub struct RulesFixture {
    /// ISO code of the currency every price is in (e.g., "GBP")
    pub currency: String,

    /// Map of SKU -> tiers for that SKU
    pub rules: FxHashMap<String, Vec<TierFixture>>,
}

/// A single tier in YAML
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Units per application of the tier
    pub quantity: Quantity,

    /// Price for `quantity` units
    pub price: PriceFixture,
}

/// A price as written in YAML.
///
/// Integers are minor units, strings are exact major-unit decimals with an optional currency
/// code (e.g., `"1.30"` or `"1.30 GBP"`). YAML floats are kept so they can be rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceFixture {
    /// Minor units
    Minor(i64),

    /// Decimal string
    Text(String),

    /// Binary float
    Float(f64),
}

impl PriceFixture {
    /// Convert to an [`Amount`] in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price string cannot be parsed or names a different currency.
    pub fn to_amount(&self, currency: &'static Currency) -> Result<Amount, FixtureError> {
        match self {
            PriceFixture::Minor(minor) => Ok(Amount::Minor(*minor)),
            PriceFixture::Float(value) => Ok(Amount::Float(*value)),
            PriceFixture::Text(text) => {
                let (amount, price_currency) = parse_price(text)?;

                match price_currency {
                    Some(found) if found != currency => Err(FixtureError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        found.iso_alpha_code.to_string(),
                    )),
                    _ => Ok(Amount::Major(amount)),
                }
            }
        }
    }
}

impl RulesFixture {
    /// Build and validate the rule set described by this fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the currency is unknown, a price is malformed, or the rules fail
    /// validation.
    pub fn into_rule_set<'a>(self) -> Result<PricingRuleSet<'a>, FixtureError> {
        let currency = currency_for_code(&self.currency)
            .ok_or_else(|| FixtureError::UnknownCurrency(self.currency.clone()))?;

        let mut rules = Vec::new();

        for (item, tiers) in self.rules {
            let item = Sku::from(item);

            for tier in tiers {
                let amount = tier.price.to_amount(currency)?;

                rules.push(PricingRule::with_amount(
                    item.clone(),
                    tier.quantity,
                    amount,
                    currency,
                )?);
            }
        }

        Ok(PricingRuleSet::new(currency, rules)?)
    }
}

/// Parse a price string (e.g., "1.30" or "1.30 GBP") into a decimal and optional currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT [CURRENCY]", if the amount
/// cannot be parsed as a decimal, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, Option<&'static Currency>), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let (amount, code) = match parts.as_slice() {
        [amount] => (*amount, None),
        [amount, code] => (*amount, Some(*code)),
        _ => {
            return Err(FixtureError::InvalidPrice(format!(
                "Expected format 'AMOUNT [CURRENCY]', got: {s}"
            )));
        }
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = code
        .map(|code| {
            currency_for_code(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))
        })
        .transpose()?;

    Ok((amount, currency))
}
