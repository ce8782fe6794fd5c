//! Core records and errors for the billing desk

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::invoice::{BillingMode, InvoiceError};

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier for the product
    pub id: String,
    /// Name shown in the catalog and copied into bill lines
    pub name: String,
    /// Catalog price per unit
    pub price: BigDecimal,
    /// When the product was created
    pub created_at: NaiveDateTime,
}

impl Product {
    /// Create a new product with a generated id
    pub fn new(name: String, price: BigDecimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            price,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Customer and vehicle details captured on the bill form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone: String,
    pub vehicle_number: String,
    pub vehicle_name: String,
    /// Customer GSTIN, if the customer is GST registered
    pub gst_number: Option<String>,
}

/// Stored customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    #[serde(flatten)]
    pub details: CustomerDetails,
    pub created_at: NaiveDateTime,
}

impl Customer {
    /// Create a new customer record with a generated id
    pub fn new(details: CustomerDetails) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            details,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Stored bill header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// Unique identifier for the bill
    pub id: String,
    /// Sequential invoice number assigned by storage
    pub invoice_no: u64,
    pub customer_id: String,
    pub bill_date: NaiveDateTime,
    pub billing_mode: BillingMode,
    /// Pre-tax subtotal; taxes are recomputed from the percentages
    pub total_amount: BigDecimal,
    /// Effective CGST percentage, `None` on legacy rows
    pub cgst_percentage: Option<BigDecimal>,
    /// Effective SGST percentage, `None` on legacy rows
    pub sgst_percentage: Option<BigDecimal>,
    pub created_at: NaiveDateTime,
}

/// Stored bill line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub id: String,
    pub bill_id: String,
    /// Catalog product the line was added from, if any
    pub product_id: Option<String>,
    pub description: String,
    pub quantity: u32,
    /// Unit price
    pub price: BigDecimal,
    pub amount: BigDecimal,
}

/// Bill together with its joined customer, as listed in bill history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    pub bill: Bill,
    pub customer: Option<Customer>,
}

/// Errors that can occur in the billing desk
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),
    #[error("Bill not found: {0}")]
    BillNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Invoice(#[from] InvoiceError),
}

/// Result type for billing desk operations
pub type BillingResult<T> = Result<T, BillingError>;
