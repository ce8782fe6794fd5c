//! Printable invoice model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::draft::BillDraft;
use super::line_item::{BillingMode, LineItem};
use super::totals::{compute_totals, InvoiceTotals, TaxPolicy};
use super::InvoiceResult;
use crate::config::{InvoiceNumbering, ShopProfile};
use crate::format::{capitalize_words, format_inr, format_rupees};
use crate::types::CustomerDetails;

/// Render an invoice number as prefix plus zero-padded number, e.g. `AM_07`
pub fn format_invoice_number(prefix: &str, width: usize, number: u64) -> String {
    format!("{}{:0width$}", prefix, number, width = width)
}

/// Identity and parties of an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    pub invoice_no: u64,
    pub bill_date: NaiveDateTime,
    pub shop: ShopProfile,
    pub customer: CustomerDetails,
}

/// Everything the print layout needs, with figures frozen at build time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub bill_date: NaiveDateTime,
    pub shop: ShopProfile,
    pub customer: CustomerDetails,
    pub billing_mode: BillingMode,
    pub lines: Vec<LineItem>,
    /// Effective policy; untaxed for labour bills
    pub tax_policy: TaxPolicy,
    pub totals: InvoiceTotals,
    /// Lower-case words line, e.g. "one hundred rupees only"
    pub amount_in_words: String,
}

impl InvoiceDocument {
    /// Assemble a document, computing totals and words from the lines
    pub fn build(
        numbering: &InvoiceNumbering,
        header: InvoiceHeader,
        billing_mode: BillingMode,
        lines: Vec<LineItem>,
        tax_policy: &TaxPolicy,
    ) -> InvoiceResult<Self> {
        let tax_policy = tax_policy.for_mode(billing_mode);
        let totals = compute_totals(&lines, &tax_policy);
        let amount_in_words = totals.amount_in_words()?;

        Ok(Self {
            invoice_number: format_invoice_number(
                &numbering.prefix,
                numbering.number_width,
                header.invoice_no,
            ),
            bill_date: header.bill_date,
            shop: header.shop,
            customer: header.customer,
            billing_mode,
            lines,
            tax_policy,
            totals,
            amount_in_words,
        })
    }

    /// Freeze a draft into a document
    pub fn from_draft(
        numbering: &InvoiceNumbering,
        header: InvoiceHeader,
        draft: &BillDraft,
    ) -> InvoiceResult<Self> {
        Self::build(
            numbering,
            header,
            draft.billing_mode(),
            draft.items(),
            draft.tax_policy(),
        )
    }

    /// Plain-text rendering of the invoice for printing
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InvoiceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(64);

        writeln!(f, "{}", self.shop.name)?;
        if let Some(address) = &self.shop.address {
            writeln!(f, "{}", address)?;
        }
        if let Some(phone) = &self.shop.phone {
            writeln!(f, "Phone: {}", phone)?;
        }
        if let Some(gstin) = &self.shop.gstin {
            writeln!(f, "GSTIN: {}", gstin)?;
        }
        if let Some(email) = &self.shop.email {
            writeln!(f, "{}", email)?;
        }
        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "Invoice No: {:<20} Date: {}",
            self.invoice_number,
            self.bill_date.format("%d/%m/%Y")
        )?;
        writeln!(f, "{}", rule)?;

        let customer = &self.customer;
        writeln!(f, "Customer: {}", customer.name)?;
        if !customer.phone.is_empty() {
            writeln!(f, "Phone: {}", customer.phone)?;
        }
        if !customer.vehicle_number.is_empty() || !customer.vehicle_name.is_empty() {
            writeln!(
                f,
                "Vehicle: {} {}",
                customer.vehicle_number, customer.vehicle_name
            )?;
        }
        if let Some(gst_number) = customer.gst_number.as_deref().filter(|g| !g.is_empty()) {
            writeln!(f, "Customer GSTIN: {}", gst_number)?;
        }
        writeln!(f, "{}", rule)?;

        writeln!(
            f,
            "{:<4}{:<28}{:>6}{:>12}{:>14}",
            "#", "Description", "Qty", "Rate", "Amount"
        )?;
        for (index, line) in self.lines.iter().enumerate() {
            writeln!(
                f,
                "{:<4}{:<28}{:>6}{:>12}{:>14}",
                index + 1,
                line.description,
                line.quantity,
                format_inr(&line.unit_price),
                format_inr(&line.line_amount)
            )?;
        }
        writeln!(f, "{}", rule)?;

        writeln!(f, "{:<50}{:>14}", "Subtotal", format_rupees(&self.totals.subtotal))?;
        if self.tax_policy.apply_tax {
            writeln!(
                f,
                "{:<50}{:>14}",
                format!("CGST ({}%)", self.tax_policy.cgst_percent),
                format_rupees(&self.totals.cgst_amount)
            )?;
            writeln!(
                f,
                "{:<50}{:>14}",
                format!("SGST ({}%)", self.tax_policy.sgst_percent),
                format_rupees(&self.totals.sgst_amount)
            )?;
        }
        writeln!(
            f,
            "{:<50}{:>14}",
            "Grand Total",
            format_rupees(&self.totals.grand_total)
        )?;
        writeln!(f, "{}", capitalize_words(&self.amount_in_words))?;

        Ok(())
    }
}
