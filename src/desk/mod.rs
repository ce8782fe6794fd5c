//! Shop-facing operations: product catalog, bill book and dashboard

pub mod bills;
pub mod catalog;
pub mod core;
pub mod dashboard;

pub use bills::*;
pub use catalog::*;
pub use core::*;
pub use dashboard::*;
