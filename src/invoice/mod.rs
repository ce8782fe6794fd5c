//! Invoice computation engine
//!
//! Pure, synchronous building blocks that turn raw line entries and tax
//! settings into the figures and words printed on an invoice. Nothing in this
//! module performs I/O or keeps state between calls.

pub mod document;
pub mod draft;
pub mod line_item;
pub mod totals;
pub mod words;

pub use document::*;
pub use draft::*;
pub use line_item::*;
pub use totals::*;
pub use words::*;

/// Errors raised by the invoice computation engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvoiceError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Amount out of range: {amount} exceeds the maximum of {max}")]
    AmountOutOfRange { amount: String, max: u64 },
    #[error("Line not found: {0}")]
    LineNotFound(String),
}

/// Result type for invoice computations
pub type InvoiceResult<T> = Result<T, InvoiceError>;
