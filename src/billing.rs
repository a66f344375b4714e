use std::fmt;

use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::BillingError;

/// A billable entry as written in the invoice definition.
#[derive(Debug, PartialEq, Clone)]
pub struct LineItem {
    pub description: String,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub rate: Option<Decimal>,
}

/// An amount shown with thousands separators and two decimals: 32,500.00
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Money(pub Decimal);

impl Money {
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        let abs = rounded.abs();
        let whole = abs.trunc();
        let cents = ((abs - whole) * Decimal::ONE_HUNDRED)
            .to_u32()
            .ok_or(fmt::Error)?;
        let whole = whole.to_u128().ok_or(fmt::Error)?;

        if rounded.is_sign_negative() && !rounded.is_zero() {
            f.write_str("-")?;
        }
        write!(
            f,
            "{}.{:02}",
            whole.to_formatted_string(&Locale::en),
            cents
        )
    }
}

pub fn format_currency(amount: Decimal) -> String {
    Money(amount).to_string()
}

/// A line item ready to be placed in the template.
#[derive(Debug, PartialEq, Clone)]
pub struct DisplayItem {
    pub description: String,
    pub quantity: String,
    pub amount_display: String,
    /// `None` unless the invoice is in rate mode, then empty for items
    /// without a rate.
    pub rate_display: Option<String>,
}

impl DisplayItem {
    fn new(item: &LineItem, show_rate: bool) -> Self {
        let rate_display = show_rate.then(|| match item.rate {
            Some(rate) => format!("${}/hr", Money(rate)),
            None => String::new(),
        });
        Self {
            description: item.description.clone(),
            quantity: item.quantity.to_string(),
            amount_display: format_currency(item.amount),
            rate_display,
        }
    }
}

/// Rate mode is on for the whole document as soon as one item has a rate.
pub fn show_rate(items: &[LineItem]) -> bool {
    items.iter().any(|i| i.rate.is_some())
}

pub fn display_items(items: &[LineItem]) -> Vec<DisplayItem> {
    let show_rate = show_rate(items);
    items
        .iter()
        .map(|item| DisplayItem::new(item, show_rate))
        .collect()
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvoiceTotal {
    pub subtotal: Money,
    pub total: Money,
}

impl InvoiceTotal {
    pub fn calculate(items: &[LineItem]) -> Result<Self, BillingError> {
        let subtotal = items.iter().enumerate().try_fold(
            Money::default(),
            |acc, (index, item)| {
                acc.checked_add(Money(item.amount))
                    .ok_or(BillingError::Overflow { index })
            },
        )?;
        Ok(Self {
            subtotal,
            total: subtotal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn item(amount: Decimal, rate: Option<Decimal>) -> LineItem {
        LineItem {
            description: "Work".to_string(),
            quantity: dec!(1),
            amount,
            rate,
        }
    }

    #[test]
    fn currency_examples() {
        assert_eq!(format_currency(dec!(32500)), "32,500.00");
        assert_eq!(format_currency(dec!(1000)), "1,000.00");
        assert_eq!(format_currency(dec!(0)), "0.00");
        assert_eq!(format_currency(dec!(1234567.5)), "1,234,567.50");
        assert_eq!(format_currency(dec!(999.999)), "1,000.00");
        assert_eq!(format_currency(dec!(0.125)), "0.12");
        assert_eq!(format_currency(dec!(-1500.5)), "-1,500.50");
        assert_eq!(format_currency(dec!(-0.001)), "0.00");
    }

    #[test]
    fn no_rate_mode() {
        let items = vec![item(dec!(100), None), item(dec!(50), None)];
        assert!(!show_rate(&items));
        let display = display_items(&items);
        assert!(display.iter().all(|d| d.rate_display.is_none()));
        assert_eq!(display[0].amount_display, "100.00");
    }

    #[test]
    fn mixed_rate_mode() {
        let items = vec![item(dec!(1600), Some(dec!(40))), item(dec!(50), None)];
        assert!(show_rate(&items));
        let display = display_items(&items);
        assert_eq!(display[0].rate_display.as_deref(), Some("$40.00/hr"));
        assert_eq!(display[1].rate_display.as_deref(), Some(""));
    }

    #[test]
    fn display_keeps_order_and_quantity() {
        let mut items = vec![item(dec!(3), None), item(dec!(1), None)];
        items[0].description = "First".to_string();
        items[1].quantity = dec!(2.5);
        let display = display_items(&items);
        assert_eq!(display[0].description, "First");
        assert_eq!(display[1].quantity, "2.5");
    }

    #[test]
    fn total_of_no_items() -> Result<(), BillingError> {
        let total = InvoiceTotal::calculate(&[])?;
        assert_eq!(total.total.to_string(), "0.00");
        Ok(())
    }

    #[test]
    fn total_matches_subtotal() -> Result<(), BillingError> {
        let items = vec![item(dec!(100), None), item(dec!(50), None)];
        let total = InvoiceTotal::calculate(&items)?;
        assert_eq!(total.subtotal, Money(dec!(150)));
        assert_eq!(total.total, total.subtotal);
        assert_eq!(total.total.to_string(), "150.00");
        Ok(())
    }

    fn huge() -> Decimal {
        Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0)
    }

    #[test]
    fn total_overflow_is_an_error() {
        let huge = huge();
        let items = vec![item(huge, None), item(dec!(1), None), item(huge, None)];
        assert_eq!(
            InvoiceTotal::calculate(&items),
            Err(BillingError::Overflow { index: 2 })
        );
    }

    #[test]
    fn largest_single_amount_still_formats() {
        assert_eq!(
            format_currency(huge()),
            "50,000,000,000,000,000,000,000,000,000.00"
        );
    }

    prop_compose! {
        fn cents()(n in -10_000_000_000i64..10_000_000_000i64) -> Decimal {
            Decimal::new(n, 2)
        }
    }

    proptest! {
        #[test]
        fn currency_shape(amount in cents()) {
            let text = format_currency(amount);
            let text = text.strip_prefix('-').unwrap_or(&text);
            let (whole, frac) = text.split_once('.').unwrap();
            prop_assert_eq!(frac.len(), 2);
            prop_assert!(frac.chars().all(|c| c.is_ascii_digit()));
            for (i, group) in whole.split(',').enumerate() {
                prop_assert!(!group.is_empty() && group.len() <= 3);
                prop_assert!(i == 0 || group.len() == 3);
                prop_assert!(group.chars().all(|c| c.is_ascii_digit()));
            }
            let parsed: Decimal = text.replace(',', "").parse().unwrap();
            prop_assert_eq!(parsed, amount.abs());
        }

        #[test]
        fn total_is_order_independent(
            mut amounts in prop::collection::vec(cents(), 0..20)
        ) {
            let forward: Vec<LineItem> =
                amounts.iter().map(|a| item(*a, None)).collect();
            amounts.reverse();
            let backward: Vec<LineItem> =
                amounts.iter().map(|a| item(*a, None)).collect();

            let expected: Decimal = amounts.iter().sum();
            let total = InvoiceTotal::calculate(&forward).unwrap();
            prop_assert_eq!(total.total, Money(expected));
            prop_assert_eq!(total, InvoiceTotal::calculate(&backward).unwrap());
        }
    }
}
