//! Bill under construction
//!
//! A [`BillDraft`] is an owned value holding the lines, billing mode and tax
//! settings of the bill being entered. Totals are never cached; every call to
//! [`BillDraft::totals`] recomputes them from the current lines.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::line_item::{make_line_item, BillingMode, LineItem, LineItemInput};
use super::totals::{compute_totals, InvoiceTotals, TaxPolicy};
use super::{InvoiceError, InvoiceResult};
use crate::types::Product;

/// A line of the draft with its identity and catalog origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    /// Identity used to update or remove the line
    pub id: String,
    pub product_id: Option<String>,
    pub item: LineItem,
}

/// Editable bill: ordered lines plus billing mode and tax settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDraft {
    billing_mode: BillingMode,
    tax_policy: TaxPolicy,
    lines: Vec<DraftLine>,
}

impl Default for BillDraft {
    fn default() -> Self {
        Self::new(BillingMode::Product)
    }
}

impl BillDraft {
    /// Create an empty draft with the default 9% + 9% tax policy
    pub fn new(billing_mode: BillingMode) -> Self {
        Self {
            billing_mode,
            tax_policy: TaxPolicy::default(),
            lines: Vec::new(),
        }
    }

    /// Replace the tax policy, builder style
    pub fn with_tax(mut self, tax_policy: TaxPolicy) -> Self {
        self.tax_policy = tax_policy;
        self
    }

    pub fn billing_mode(&self) -> BillingMode {
        self.billing_mode
    }

    /// Switch the billing mode. Switching to labour is refused while any
    /// line has a quantity other than 1.
    pub fn set_billing_mode(&mut self, billing_mode: BillingMode) -> InvoiceResult<()> {
        if billing_mode == BillingMode::Labour {
            Self::check_labour_quantities(&self.lines)?;
        }
        self.billing_mode = billing_mode;
        Ok(())
    }

    /// Tax policy as entered, before the labour rule is applied
    pub fn tax_policy(&self) -> &TaxPolicy {
        &self.tax_policy
    }

    pub fn set_tax_policy(&mut self, tax_policy: TaxPolicy) -> InvoiceResult<()> {
        tax_policy.validate()?;
        self.tax_policy = tax_policy;
        Ok(())
    }

    /// Tax policy that will actually be applied to this draft
    pub fn effective_tax_policy(&self) -> TaxPolicy {
        self.tax_policy.for_mode(self.billing_mode)
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// Line items in entry order
    pub fn items(&self) -> Vec<LineItem> {
        self.lines.iter().map(|line| line.item.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Check the draft is fit to be saved: valid tax rates, and labour lines
    /// at quantity 1
    pub fn validate(&self) -> InvoiceResult<()> {
        self.tax_policy.validate()?;
        if self.billing_mode == BillingMode::Labour {
            Self::check_labour_quantities(&self.lines)?;
        }
        Ok(())
    }

    fn check_labour_quantities(lines: &[DraftLine]) -> InvoiceResult<()> {
        match lines.iter().find(|line| line.item.quantity != 1) {
            Some(line) => Err(InvoiceError::Validation(format!(
                "Labour lines always have a quantity of 1, '{}' has {}",
                line.item.description, line.item.quantity
            ))),
            None => Ok(()),
        }
    }

    /// Add one unit of a catalog product.
    ///
    /// In product billing, a product already on the bill has its quantity
    /// raised by one. Otherwise a new per-unit line at the catalog price is
    /// appended; labour lines always stay at quantity 1.
    pub fn add_product(&mut self, product: &Product) -> &DraftLine {
        let position = match self.billing_mode {
            BillingMode::Product => self
                .lines
                .iter()
                .position(|line| line.product_id.as_deref() == Some(product.id.as_str())),
            BillingMode::Labour => None,
        };

        let index = match position {
            Some(index) => {
                let line = &mut self.lines[index];
                line.item = LineItem::per_unit(
                    line.item.description.clone(),
                    line.item.quantity.saturating_add(1),
                    line.item.unit_price.clone(),
                );
                debug!(product_id = %product.id, quantity = line.item.quantity, "Incremented draft line");
                index
            }
            None => {
                self.lines.push(DraftLine {
                    id: Uuid::new_v4().to_string(),
                    product_id: Some(product.id.clone()),
                    item: LineItem::per_unit(product.name.clone(), 1, product.price.clone()),
                });
                debug!(product_id = %product.id, "Added product to draft");
                self.lines.len() - 1
            }
        };

        &self.lines[index]
    }

    /// Add a free-text line through the line-item calculator
    pub fn add_line(&mut self, input: &LineItemInput) -> InvoiceResult<&DraftLine> {
        let item = make_line_item(input, self.billing_mode)?;
        self.lines.push(DraftLine {
            id: Uuid::new_v4().to_string(),
            product_id: None,
            item,
        });

        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Change the quantity of a line, recomputing its amount from the unit price
    pub fn update_quantity(&mut self, line_id: &str, quantity: u32) -> InvoiceResult<()> {
        if self.billing_mode == BillingMode::Labour && quantity != 1 {
            return Err(InvoiceError::Validation(
                "Labour lines always have a quantity of 1".to_string(),
            ));
        }

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.id == line_id)
            .ok_or_else(|| InvoiceError::LineNotFound(line_id.to_string()))?;

        line.item = line.item.with_quantity(quantity)?;
        Ok(())
    }

    /// Remove a line by identity
    pub fn remove_line(&mut self, line_id: &str) -> InvoiceResult<DraftLine> {
        let index = self
            .lines
            .iter()
            .position(|line| line.id == line_id)
            .ok_or_else(|| InvoiceError::LineNotFound(line_id.to_string()))?;

        Ok(self.lines.remove(index))
    }

    /// Current totals under the effective tax policy
    pub fn totals(&self) -> InvoiceTotals {
        compute_totals(&self.items(), &self.effective_tax_policy())
    }

    /// Clear all lines and restore the default tax rates, keeping the billing mode
    pub fn reset(&mut self) {
        *self = Self::new(self.billing_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::PriceMode;
    use bigdecimal::BigDecimal;

    fn product(name: &str, price: i64) -> Product {
        Product::new(name.to_string(), BigDecimal::from(price))
    }

    #[test]
    fn test_add_product_merges_same_product() {
        let oil = product("Engine Oil", 3500);
        let mut draft = BillDraft::default();

        let first_id = draft.add_product(&oil).id.clone();
        let second_id = draft.add_product(&oil).id.clone();

        assert_eq!(first_id, second_id);
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].item.quantity, 2);
        assert_eq!(draft.lines()[0].item.line_amount, BigDecimal::from(7000));
    }

    #[test]
    fn test_update_and_remove_lines() {
        let mut draft = BillDraft::default();
        let filter_id = draft.add_product(&product("Oil Filter", 450)).id.clone();
        let pads_id = draft.add_product(&product("Brake Pads", 1200)).id.clone();

        draft.update_quantity(&filter_id, 3).unwrap();
        assert_eq!(draft.totals().subtotal, BigDecimal::from(2550));

        assert!(draft.update_quantity(&filter_id, 0).is_err());
        assert!(matches!(
            draft.update_quantity("missing", 2),
            Err(InvoiceError::LineNotFound(_))
        ));

        let removed = draft.remove_line(&pads_id).unwrap();
        assert_eq!(removed.item.description, "Brake Pads");
        assert_eq!(draft.totals().subtotal, BigDecimal::from(1350));
        assert!(draft.remove_line(&pads_id).is_err());
    }

    #[test]
    fn test_labour_draft_is_untaxed() {
        let mut draft = BillDraft::new(BillingMode::Labour);
        draft
            .add_line(&LineItemInput::new(
                "Wheel alignment",
                Some(3),
                Some(BigDecimal::from(800)),
                PriceMode::Total,
            ))
            .unwrap();

        assert!(draft.tax_policy().apply_tax);
        assert!(!draft.effective_tax_policy().apply_tax);

        let totals = draft.totals();
        assert_eq!(draft.lines()[0].item.quantity, 1);
        assert_eq!(totals.grand_total, BigDecimal::from(800));
    }

    #[test]
    fn test_labour_draft_never_merges_or_rescales() {
        let wash = product("Car wash", 300);
        let mut draft = BillDraft::new(BillingMode::Labour);
        let line_id = draft.add_product(&wash).id.clone();
        draft.add_product(&wash);

        assert_eq!(draft.lines().len(), 2);
        assert!(draft.lines().iter().all(|line| line.item.quantity == 1));
        assert!(draft.update_quantity(&line_id, 2).is_err());
        assert!(draft.update_quantity(&line_id, 1).is_ok());
    }

    #[test]
    fn test_switching_mode_changes_tax() {
        let mut draft = BillDraft::default();
        draft.add_product(&product("Battery", 5000));
        assert_eq!(draft.totals().grand_total, BigDecimal::from(5900));

        draft.set_billing_mode(BillingMode::Labour).unwrap();
        assert_eq!(draft.totals().grand_total, BigDecimal::from(5000));
    }

    #[test]
    fn test_labour_switch_refused_with_multi_quantity_lines() {
        let oil = product("Engine Oil", 3500);
        let mut draft = BillDraft::default();
        draft.add_product(&oil);
        draft.add_product(&oil);

        assert!(matches!(
            draft.set_billing_mode(BillingMode::Labour),
            Err(InvoiceError::Validation(_))
        ));
        assert_eq!(draft.billing_mode(), BillingMode::Product);
        assert!(draft.validate().is_ok());

        let line_id = draft.lines()[0].id.clone();
        draft.update_quantity(&line_id, 1).unwrap();
        draft.set_billing_mode(BillingMode::Labour).unwrap();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut draft = BillDraft::default().with_tax(TaxPolicy::untaxed());
        draft.add_product(&product("Horn", 650));
        draft.reset();

        assert!(draft.is_empty());
        assert_eq!(draft.tax_policy(), &TaxPolicy::default());
    }

    #[test]
    fn test_invalid_tax_policy_is_rejected() {
        let mut draft = BillDraft::default();
        let policy = TaxPolicy::intra_state(BigDecimal::from(-9), BigDecimal::from(9));
        assert!(draft.set_tax_policy(policy).is_err());
        assert_eq!(draft.tax_policy(), &TaxPolicy::default());
    }
}
