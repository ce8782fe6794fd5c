//! # Billing Core
//!
//! Invoicing library for an automobile service shop: product catalog, GST
//! bills with per-unit or lump-sum pricing, labour bills, bill history and a
//! yearly sales dashboard.
//!
//! ## Features
//!
//! - **Invoice computation**: line amounts, subtotal, CGST/SGST and grand total
//! - **Amount in words**: Indian numbering (crore, lakh, thousand, hundred)
//! - **Labour bills**: untaxed, single-quantity service lines
//! - **Bill history**: saved bills can be searched and re-rendered for printing
//! - **Storage abstraction**: backend-agnostic design with an in-memory demo store
//!
//! ## Quick Start
//!
//! ```rust
//! use billing_core::{compute_totals, to_words, LineItem, TaxPolicy};
//! use bigdecimal::BigDecimal;
//!
//! let lines = vec![LineItem::per_unit("Oil Filter", 2, BigDecimal::from(450))];
//! let totals = compute_totals(&lines, &TaxPolicy::default());
//!
//! assert_eq!(totals.grand_total, BigDecimal::from(1062));
//! assert_eq!(to_words(1062).unwrap(), "one thousand and sixty two");
//! ```

pub mod config;
pub mod desk;
pub mod format;
pub mod invoice;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use desk::*;
pub use invoice::*;
pub use traits::*;
pub use types::*;
