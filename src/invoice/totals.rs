//! Subtotal, CGST/SGST and grand total calculation

use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use super::line_item::{BillingMode, LineItem};
use super::words::{amount_in_words, round_to_rupees};
use super::{InvoiceError, InvoiceResult};

/// Default CGST percentage (half of the common 18% GST slab)
pub const DEFAULT_CGST_PERCENT: u32 = 9;
/// Default SGST percentage (half of the common 18% GST slab)
pub const DEFAULT_SGST_PERCENT: u32 = 9;

/// Tax settings for one invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxPolicy {
    pub apply_tax: bool,
    pub cgst_percent: BigDecimal,
    pub sgst_percent: BigDecimal,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self::intra_state(
            BigDecimal::from(DEFAULT_CGST_PERCENT),
            BigDecimal::from(DEFAULT_SGST_PERCENT),
        )
    }
}

impl TaxPolicy {
    /// Taxed policy with explicit CGST and SGST percentages
    pub fn intra_state(cgst_percent: BigDecimal, sgst_percent: BigDecimal) -> Self {
        Self {
            apply_tax: true,
            cgst_percent,
            sgst_percent,
        }
    }

    /// Untaxed policy. The stored percentages keep their defaults but are ignored.
    pub fn untaxed() -> Self {
        Self {
            apply_tax: false,
            ..Self::default()
        }
    }

    /// Apply the billing mode rule: labour bills are never taxed
    pub fn for_mode(&self, billing_mode: BillingMode) -> Self {
        match billing_mode {
            BillingMode::Labour => Self {
                apply_tax: false,
                ..self.clone()
            },
            BillingMode::Product => self.clone(),
        }
    }

    /// CGST percentage that actually applies
    pub fn effective_cgst(&self) -> BigDecimal {
        if self.apply_tax {
            self.cgst_percent.clone()
        } else {
            BigDecimal::zero()
        }
    }

    /// SGST percentage that actually applies
    pub fn effective_sgst(&self) -> BigDecimal {
        if self.apply_tax {
            self.sgst_percent.clone()
        } else {
            BigDecimal::zero()
        }
    }

    /// Reject negative percentages
    pub fn validate(&self) -> InvoiceResult<()> {
        if self.cgst_percent < BigDecimal::zero() || self.sgst_percent < BigDecimal::zero() {
            return Err(InvoiceError::Validation(format!(
                "Tax percentages cannot be negative: cgst = {}, sgst = {}",
                self.cgst_percent, self.sgst_percent
            )));
        }

        Ok(())
    }
}

/// Derived invoice figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: BigDecimal,
    pub cgst_amount: BigDecimal,
    pub sgst_amount: BigDecimal,
    pub grand_total: BigDecimal,
}

impl InvoiceTotals {
    /// All-zero totals of an empty invoice
    pub fn zero() -> Self {
        Self {
            subtotal: BigDecimal::zero(),
            cgst_amount: BigDecimal::zero(),
            sgst_amount: BigDecimal::zero(),
            grand_total: BigDecimal::zero(),
        }
    }

    /// Total tax (CGST + SGST)
    pub fn total_tax(&self) -> BigDecimal {
        &self.cgst_amount + &self.sgst_amount
    }

    /// Grand total rounded to whole rupees
    pub fn rounded_grand_total(&self) -> BigDecimal {
        round_to_rupees(&self.grand_total)
    }

    /// Words line for the grand total
    pub fn amount_in_words(&self) -> InvoiceResult<String> {
        amount_in_words(&self.grand_total)
    }
}

/// Aggregate line items and apply the tax policy.
///
/// Amounts are summed in input order and kept at full precision; rounding is
/// left to presentation. An empty list yields all-zero totals.
pub fn compute_totals(items: &[LineItem], policy: &TaxPolicy) -> InvoiceTotals {
    let subtotal: BigDecimal = items.iter().map(|item| &item.line_amount).sum();

    if !policy.apply_tax {
        return InvoiceTotals {
            grand_total: subtotal.clone(),
            subtotal,
            cgst_amount: BigDecimal::zero(),
            sgst_amount: BigDecimal::zero(),
        };
    }

    let cgst_amount = (&subtotal * &policy.cgst_percent) / BigDecimal::from(100);
    let sgst_amount = (&subtotal * &policy.sgst_percent) / BigDecimal::from(100);
    let grand_total = &subtotal + &cgst_amount + &sgst_amount;

    InvoiceTotals {
        subtotal,
        cgst_amount,
        sgst_amount,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(description: &str, quantity: u32, price: i64) -> LineItem {
        LineItem::per_unit(description, quantity, BigDecimal::from(price))
    }

    #[test]
    fn test_empty_items_yield_zero() {
        let totals = compute_totals(&[], &TaxPolicy::default());
        assert_eq!(totals, InvoiceTotals::zero());

        let totals = compute_totals(&[], &TaxPolicy::untaxed());
        assert_eq!(totals.grand_total, BigDecimal::from(0));
    }

    #[test]
    fn test_untaxed_total_is_subtotal() {
        let items = vec![item("Oil", 2, 350), item("Filter", 1, 120)];
        let policy = TaxPolicy {
            apply_tax: false,
            cgst_percent: BigDecimal::from(14),
            sgst_percent: BigDecimal::from(14),
        };

        let totals = compute_totals(&items, &policy);
        assert_eq!(totals.subtotal, BigDecimal::from(820));
        assert_eq!(totals.cgst_amount, BigDecimal::from(0));
        assert_eq!(totals.sgst_amount, BigDecimal::from(0));
        assert_eq!(totals.grand_total, BigDecimal::from(820));
    }

    #[test]
    fn test_eighteen_percent_gst() {
        let items = vec![item("Coolant", 3, 333), item("Bulb", 7, 45)];
        let totals = compute_totals(&items, &TaxPolicy::default());

        let expected = &totals.subtotal * &BigDecimal::from_str("1.18").unwrap();
        assert_eq!(totals.grand_total, expected);
        assert_eq!(totals.total_tax(), &totals.cgst_amount + &totals.sgst_amount);
    }

    #[test]
    fn test_workshop_invoice_scenario() {
        let items = vec![
            item("Oil Filter", 1, 450),
            item("Brake Pads", 1, 1200),
            item("Engine Oil", 2, 3500),
        ];
        let totals = compute_totals(&items, &TaxPolicy::default());

        assert_eq!(totals.subtotal, BigDecimal::from(8650));
        assert_eq!(totals.cgst_amount, BigDecimal::from_str("778.5").unwrap());
        assert_eq!(totals.sgst_amount, BigDecimal::from_str("778.5").unwrap());
        assert_eq!(totals.grand_total, BigDecimal::from(10207));
        assert_eq!(
            totals.amount_in_words().unwrap(),
            "ten thousand two hundred and seven rupees only"
        );
    }

    #[test]
    fn test_labour_mode_disables_tax() {
        let policy = TaxPolicy::default().for_mode(BillingMode::Labour);
        assert!(!policy.apply_tax);
        assert_eq!(policy.effective_cgst(), BigDecimal::from(0));

        let totals = compute_totals(&[item("Checkup", 1, 500)], &policy);
        assert_eq!(totals.grand_total, BigDecimal::from(500));

        let policy = TaxPolicy::default().for_mode(BillingMode::Product);
        assert!(policy.apply_tax);
        assert_eq!(policy.effective_sgst(), BigDecimal::from(9));
    }

    #[test]
    fn test_rounded_grand_total() {
        let items = vec![item("Spark Plug", 1, 95)];
        let totals = compute_totals(&items, &TaxPolicy::default());
        assert_eq!(totals.grand_total, BigDecimal::from_str("112.1").unwrap());
        assert_eq!(totals.rounded_grand_total(), BigDecimal::from(112));
    }

    #[test]
    fn test_negative_rates_are_invalid() {
        let policy = TaxPolicy::intra_state(BigDecimal::from(-1), BigDecimal::from(9));
        assert!(policy.validate().is_err());
        assert!(TaxPolicy::default().validate().is_ok());
    }
}
