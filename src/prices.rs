//! Prices
//!
//! Rule prices enter the crate as an [`Amount`] and leave it as exact
//! [`Money`]. Binary floating point never reaches the pricing arithmetic.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};

use crate::rules::ValidationError;

/// An untyped price as supplied by a caller or a rule table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Amount {
    /// A price in minor units (pence/cents).
    Minor(i64),

    /// A price in major units, as an exact decimal (e.g. `1.30`).
    Major(Decimal),

    /// A binary floating point price. Always rejected.
    Float(f64),
}

impl Amount {
    /// Convert this amount into money of the given currency.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InexactPrice`]: the amount is a float.
    /// - [`ValidationError::SubMinorPrecision`]: a decimal has more fractional digits than the
    ///   currency's minor unit.
    /// - [`ValidationError::PriceOutOfRange`]: the amount does not fit in minor units.
    /// - [`ValidationError::NegativePrice`]: the amount is below zero.
    pub fn to_money<'a>(
        self,
        currency: &'static Currency,
    ) -> Result<Money<'a, Currency>, ValidationError> {
        let minor = match self {
            Amount::Float(value) => return Err(ValidationError::InexactPrice(value)),
            Amount::Minor(minor) => minor,
            Amount::Major(amount) => major_to_minor(amount, currency)?,
        };

        if minor < 0 {
            return Err(ValidationError::NegativePrice(minor));
        }

        Ok(Money::from_minor(minor, currency))
    }
}

impl From<i64> for Amount {
    fn from(minor: i64) -> Self {
        Amount::Minor(minor)
    }
}

impl From<i32> for Amount {
    fn from(minor: i32) -> Self {
        Amount::Minor(i64::from(minor))
    }
}

impl From<u32> for Amount {
    fn from(minor: u32) -> Self {
        Amount::Minor(i64::from(minor))
    }
}

impl From<Decimal> for Amount {
    fn from(amount: Decimal) -> Self {
        Amount::Major(amount)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Float(value)
    }
}

/// Convert an exact major-unit decimal into minor units without rounding.
fn major_to_minor(amount: Decimal, currency: &'static Currency) -> Result<i64, ValidationError> {
    let normalized = amount.normalize();

    if normalized.scale() > currency.exponent {
        return Err(ValidationError::SubMinorPrecision {
            amount: amount.to_string(),
            currency: currency.iso_alpha_code,
        });
    }

    let scale = Decimal::from(10_i64.pow(currency.exponent));

    normalized
        .checked_mul(scale)
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| ValidationError::PriceOutOfRange(amount.to_string()))
}

/// Look up one of the supported ISO currencies by its alpha code.
pub fn currency_for_code(code: &str) -> Option<&'static Currency> {
    match code {
        "GBP" => Some(GBP),
        "USD" => Some(USD),
        "EUR" => Some(EUR),
        _ => None,
    }
}

/// Zero money in the given currency.
pub fn zero<'a>(currency: &'static Currency) -> Money<'a, Currency> {
    Money::from_minor(0, currency)
}
