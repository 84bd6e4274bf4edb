//! Receipt

use std::{fmt, hash::Hash, io};

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    checkout::ItemCounts,
    prices::zero,
    pricing::{ItemBreakdown, PricingError, PricingRuleSet},
    sku::Sku,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Writing the receipt failed.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Itemised receipt for a checkout.
#[derive(Debug, Clone)]
pub struct Receipt<'a, K = Sku> {
    /// One line per item, sorted by item
    lines: Vec<ItemBreakdown<'a, K>>,

    /// What the items would cost at their unit prices
    full_price: Money<'a, Currency>,

    /// Total amount paid
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a, K> Receipt<'a, K>
where
    K: Eq + Hash + Ord + Clone + fmt::Display,
{
    /// Price every counted item and build a receipt.
    ///
    /// Items with a count of zero are left off the receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an item has no pricing rules or money arithmetic fails.
    pub fn from_counts(
        rules: &PricingRuleSet<'a, K>,
        counts: &ItemCounts<K>,
    ) -> Result<Self, ReceiptError> {
        let mut entries: Vec<_> = counts.iter().filter(|(_item, count)| **count > 0).collect();
        entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        let mut lines = Vec::with_capacity(entries.len());
        let mut full_price = zero(rules.currency());
        let mut total = zero(rules.currency());

        for (item, &quantity) in entries {
            let breakdown = rules.breakdown_for_item(item, quantity)?;

            // Same unit tier the decomposition settles remainders with.
            let unit_price = rules
                .rules_for(item)
                .and_then(|tiers| tiers.iter().find(|rule| rule.is_unit_price()))
                .map_or(0, |rule| rule.price().to_minor_units());

            let line_full_price = unit_price
                .checked_mul(i64::from(quantity))
                .ok_or(PricingError::Overflow)?;

            full_price = full_price.add(Money::from_minor(line_full_price, rules.currency()))?;
            total = total.add(breakdown.subtotal)?;

            lines.push(breakdown);
        }

        Ok(Self {
            lines,
            full_price,
            total,
            currency: rules.currency(),
        })
    }

    /// Receipt lines, one per item.
    pub fn lines(&self) -> &[ItemBreakdown<'a, K>] {
        &self.lines
    }

    /// What the items would cost if every unit were charged its unit price.
    pub fn full_price(&self) -> Money<'a, Currency> {
        self.full_price
    }

    /// Total amount paid.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency of the receipt.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by tiered pricing.
    ///
    /// Negative when a tier charges more per unit than the unit price.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.full_price.sub(self.total)
    }

    /// Write the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();
        builder.push_record(["Item", "Qty", "Tier", "Applied", "Subtotal"]);

        let mut item_boundary_rows: SmallVec<[usize; 16]> = SmallVec::new();
        let mut row = 1; // header is row 0

        for line in &self.lines {
            item_boundary_rows.push(row);

            for (idx, application) in line.applications.iter().enumerate() {
                let (item, quantity) = if idx == 0 {
                    (line.item.to_string(), line.quantity.to_string())
                } else {
                    (String::new(), String::new())
                };

                builder.push_record([
                    item,
                    quantity,
                    format!("{} for {}", application.quantity, application.price),
                    format!("x{}", application.times),
                    application.subtotal.to_string(),
                ]);

                row += 1;
            }
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        for &boundary in &item_boundary_rows {
            if boundary > 1 {
                theme.insert_horizontal_line(boundary, separator);
            }
        }

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..5), Alignment::right());

        writeln!(out, "\n{table}")?;
        writeln!(out, " Full price: {}", self.full_price)?;
        writeln!(out, " Savings:    {}", self.savings()?)?;
        writeln!(out, " Total:      {}", self.total)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    fn rules() -> Result<PricingRuleSet<'static>, crate::rules::ValidationError> {
        PricingRuleSet::from_tiers(
            GBP,
            [
                ("A", vec![(1, 50), (3, 130)]),
                ("B", vec![(1, 30), (2, 45)]),
                ("D", vec![(1, 15)]),
            ],
        )
    }

    #[test]
    fn lines_are_sorted_by_item() -> TestResult {
        let rules = rules()?;
        let counts: ItemCounts = "DABABA".chars().map(Sku::from).collect();

        let receipt = Receipt::from_counts(&rules, &counts)?;

        let items: Vec<_> = receipt.lines().iter().map(|line| line.item.as_str()).collect();

        assert_eq!(items, vec!["A", "B", "D"]);
        assert_eq!(receipt.total(), Money::from_minor(190, GBP));

        Ok(())
    }

    #[test]
    fn savings_compare_against_unit_prices() -> TestResult {
        let rules = rules()?;
        let counts: ItemCounts = "AAABB".chars().map(Sku::from).collect();

        let receipt = Receipt::from_counts(&rules, &counts)?;

        assert_eq!(receipt.full_price(), Money::from_minor(210, GBP));
        assert_eq!(receipt.total(), Money::from_minor(175, GBP));
        assert_eq!(receipt.savings()?, Money::from_minor(35, GBP));

        Ok(())
    }

    #[test]
    fn duplicate_unit_tiers_use_the_charged_unit_price() -> TestResult {
        let rules: PricingRuleSet<'_> =
            PricingRuleSet::from_tiers(GBP, [("A", vec![(1, 10), (1, 12)])])?;
        let counts: ItemCounts = "AA".chars().map(Sku::from).collect();

        let receipt = Receipt::from_counts(&rules, &counts)?;

        assert_eq!(receipt.total(), Money::from_minor(24, GBP));
        assert_eq!(receipt.full_price(), Money::from_minor(24, GBP));
        assert_eq!(receipt.savings()?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn dearer_tier_gives_negative_savings() -> TestResult {
        let rules: PricingRuleSet<'_> =
            PricingRuleSet::from_tiers(GBP, [("A", vec![(1, 10), (3, 40)])])?;
        let counts: ItemCounts = "AAA".chars().map(Sku::from).collect();

        let receipt = Receipt::from_counts(&rules, &counts)?;

        assert_eq!(receipt.full_price(), Money::from_minor(30, GBP));
        assert_eq!(receipt.total(), Money::from_minor(40, GBP));
        assert_eq!(receipt.savings()?, Money::from_minor(-10, GBP));

        Ok(())
    }

    #[test]
    fn unknown_item_fails() -> TestResult {
        let rules = rules()?;
        let counts: ItemCounts = "AX".chars().map(Sku::from).collect();

        let result = Receipt::from_counts(&rules, &counts);

        assert!(matches!(
            result,
            Err(ReceiptError::Pricing(PricingError::UnknownItem(item))) if item == "X"
        ));

        Ok(())
    }

    #[test]
    fn write_to_renders_tiers_and_summary() -> TestResult {
        let rules = rules()?;
        let counts: ItemCounts = "AAAAB".chars().map(Sku::from).collect();

        let receipt = Receipt::from_counts(&rules, &counts)?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;

        let output = String::from_utf8(out)?;
        assert!(output.contains("Item"));
        assert!(output.contains("x1"));
        assert!(output.contains("Full price:"));
        assert!(output.contains("Total:"));

        Ok(())
    }
}
