//! Line item normalisation
//!
//! Raw entries from the bill form arrive with optional quantities and prices.
//! [`make_line_item`] is the single place where those inputs are coerced and
//! validated into a [`LineItem`].

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use super::{InvoiceError, InvoiceResult};

/// Mutually exclusive billing modes of the bill form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    /// Quantity times unit price, optionally taxed
    #[default]
    Product,
    /// Flat per-line amount, never taxed, quantity fixed at 1
    Labour,
}

/// How an entered price should be interpreted in product billing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceMode {
    /// The price is per unit; the line amount is quantity * price
    #[default]
    PerUnit,
    /// The price is the line total; the unit price is derived from it
    Total,
}

/// Raw line entry as collected by the bill form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    pub description: String,
    /// Absent or non-positive quantities are coerced to 1
    pub quantity: Option<i64>,
    pub price: Option<BigDecimal>,
    pub price_mode: PriceMode,
}

impl LineItemInput {
    /// Create an input from already typed values
    pub fn new(
        description: impl Into<String>,
        quantity: Option<i64>,
        price: Option<BigDecimal>,
        price_mode: PriceMode,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            price,
            price_mode,
        }
    }

    /// Create an input from form text. Blank or unparseable fields become `None`.
    pub fn from_form(
        description: &str,
        quantity_text: &str,
        price_text: &str,
        price_mode: PriceMode,
    ) -> Self {
        let quantity = quantity_text.trim().parse::<i64>().ok();
        let price = match price_text.trim() {
            "" => None,
            text => BigDecimal::from_str(text).ok(),
        };

        Self::new(description, quantity, price, price_mode)
    }
}

/// A normalised invoice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: BigDecimal,
    pub line_amount: BigDecimal,
}

impl LineItem {
    /// Build a per-unit line; the amount is always recomputed
    pub fn per_unit(description: impl Into<String>, quantity: u32, unit_price: BigDecimal) -> Self {
        let line_amount = &unit_price * &BigDecimal::from(quantity);
        Self {
            description: description.into(),
            quantity,
            unit_price,
            line_amount,
        }
    }

    /// Return a copy with a new quantity, recomputing the amount from the
    /// already fixed unit price.
    ///
    /// Lines entered in [`PriceMode::Total`] keep their back-derived unit price,
    /// so changing the quantity afterwards no longer reproduces the typed total.
    pub fn with_quantity(&self, quantity: u32) -> InvoiceResult<Self> {
        if quantity == 0 {
            return Err(InvoiceError::Validation(
                "Quantity must be at least 1".to_string(),
            ));
        }

        Ok(Self::per_unit(
            self.description.clone(),
            quantity,
            self.unit_price.clone(),
        ))
    }
}

/// Coerce an optional quantity to the minimum of 1
pub fn coerce_quantity(quantity: Option<i64>) -> u32 {
    match quantity {
        Some(q) if q >= 1 => u32::try_from(q).unwrap_or(u32::MAX),
        _ => 1,
    }
}

/// Normalise a raw entry into a [`LineItem`].
///
/// Fails with [`InvoiceError::Validation`] when the description is blank or
/// the price is missing or not positive. Labour billing fixes the quantity at
/// 1 and ignores the price mode.
pub fn make_line_item(input: &LineItemInput, billing_mode: BillingMode) -> InvoiceResult<LineItem> {
    let description = input.description.trim();
    if description.is_empty() {
        debug!("Rejected line item with empty description");
        return Err(InvoiceError::Validation(
            "Item description cannot be empty".to_string(),
        ));
    }

    let price = match &input.price {
        Some(price) if *price > BigDecimal::zero() => price.clone(),
        Some(price) => {
            debug!(description, price = %price, "Rejected line item with non-positive price");
            return Err(InvoiceError::Validation(format!(
                "Price for '{}' must be greater than zero",
                description
            )));
        }
        None => {
            debug!(description, "Rejected line item without a price");
            return Err(InvoiceError::Validation(format!(
                "Price for '{}' is required",
                description
            )));
        }
    };

    let item = match (billing_mode, input.price_mode) {
        (BillingMode::Labour, _) => LineItem::per_unit(description, 1, price),
        (BillingMode::Product, PriceMode::PerUnit) => {
            LineItem::per_unit(description, coerce_quantity(input.quantity), price)
        }
        (BillingMode::Product, PriceMode::Total) => {
            let quantity = coerce_quantity(input.quantity);
            LineItem {
                description: description.to_string(),
                quantity,
                unit_price: &price / BigDecimal::from(quantity),
                line_amount: price,
            }
        }
    };

    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(description: &str, quantity: i64, price: i64, mode: PriceMode) -> LineItemInput {
        LineItemInput::new(description, Some(quantity), Some(BigDecimal::from(price)), mode)
    }

    #[test]
    fn test_empty_description_is_rejected() {
        let result = make_line_item(&input("", 1, 10, PriceMode::PerUnit), BillingMode::Product);
        assert!(matches!(result, Err(InvoiceError::Validation(_))));

        let result = make_line_item(&input("   ", 1, 10, PriceMode::PerUnit), BillingMode::Product);
        assert!(matches!(result, Err(InvoiceError::Validation(_))));
    }

    #[test]
    fn test_missing_or_non_positive_price_is_rejected() {
        let missing = LineItemInput::new("Oil", Some(1), None, PriceMode::PerUnit);
        assert!(make_line_item(&missing, BillingMode::Product).is_err());

        let zero = input("Oil", 1, 0, PriceMode::PerUnit);
        assert!(make_line_item(&zero, BillingMode::Product).is_err());

        let negative = input("Oil", 1, -20, PriceMode::Total);
        assert!(make_line_item(&negative, BillingMode::Labour).is_err());
    }

    #[test]
    fn test_per_unit_pricing() {
        let item = make_line_item(&input("Oil", 3, 100, PriceMode::PerUnit), BillingMode::Product)
            .unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.unit_price, BigDecimal::from(100));
        assert_eq!(item.line_amount, BigDecimal::from(300));
    }

    #[test]
    fn test_total_pricing_back_derives_unit_price() {
        let item = make_line_item(&input("Service", 1, 300, PriceMode::Total), BillingMode::Product)
            .unwrap();
        assert_eq!(item.unit_price, BigDecimal::from(300));
        assert_eq!(item.line_amount, BigDecimal::from(300));

        let item = make_line_item(&input("Tyres", 4, 2000, PriceMode::Total), BillingMode::Product)
            .unwrap();
        assert_eq!(item.unit_price, BigDecimal::from(500));
        assert_eq!(item.line_amount, BigDecimal::from(2000));
    }

    #[test]
    fn test_total_pricing_keeps_typed_amount_with_residue() {
        let item = make_line_item(&input("Wipers", 3, 1000, PriceMode::Total), BillingMode::Product)
            .unwrap();
        assert_eq!(item.line_amount, BigDecimal::from(1000));
        assert!(&item.unit_price * &BigDecimal::from(3) != BigDecimal::from(1000));
    }

    #[test]
    fn test_labour_forces_single_quantity() {
        for quantity in [0, 1, 5, 40] {
            let item = make_line_item(
                &input("Checkup", quantity, 500, PriceMode::Total),
                BillingMode::Labour,
            )
            .unwrap();
            assert_eq!(item.quantity, 1);
            assert_eq!(item.unit_price, BigDecimal::from(500));
            assert_eq!(item.line_amount, BigDecimal::from(500));
        }
    }

    #[test]
    fn test_quantity_coercion() {
        assert_eq!(coerce_quantity(None), 1);
        assert_eq!(coerce_quantity(Some(0)), 1);
        assert_eq!(coerce_quantity(Some(-3)), 1);
        assert_eq!(coerce_quantity(Some(7)), 7);
    }

    #[test]
    fn test_from_form_parses_text() {
        let parsed = LineItemInput::from_form(" Brake Pads ", "", "1200.50", PriceMode::PerUnit);
        assert_eq!(parsed.quantity, None);
        assert_eq!(parsed.price, Some(BigDecimal::from_str("1200.50").unwrap()));

        let item = make_line_item(&parsed, BillingMode::Product).unwrap();
        assert_eq!(item.description, "Brake Pads");
        assert_eq!(item.quantity, 1);

        let garbage = LineItemInput::from_form("Oil", "two", "abc", PriceMode::PerUnit);
        assert_eq!(garbage.quantity, None);
        assert_eq!(garbage.price, None);
    }

    #[test]
    fn test_with_quantity_uses_fixed_unit_price() {
        let item = make_line_item(&input("Tyres", 4, 2000, PriceMode::Total), BillingMode::Product)
            .unwrap();
        let updated = item.with_quantity(2).unwrap();
        assert_eq!(updated.unit_price, BigDecimal::from(500));
        assert_eq!(updated.line_amount, BigDecimal::from(1000));

        assert!(item.with_quantity(0).is_err());
    }
}
