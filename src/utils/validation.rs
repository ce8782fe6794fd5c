//! Validation utilities

use bigdecimal::{BigDecimal, Zero};

use crate::types::*;

/// Validate that a price is strictly positive
pub fn validate_positive_price(price: &BigDecimal) -> BillingResult<()> {
    if *price <= BigDecimal::zero() {
        Err(BillingError::Validation(
            "Price must be greater than zero".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate a catalog product name
pub fn validate_product_name(name: &str) -> BillingResult<()> {
    if name.trim().is_empty() {
        return Err(BillingError::Validation(
            "Product name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(BillingError::Validation(
            "Product name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a GSTIN: 15 characters, two-digit state code, upper-case alphanumerics
pub fn validate_gstin(gstin: &str) -> BillingResult<()> {
    let gstin = gstin.trim();

    if gstin.len() != 15 {
        return Err(BillingError::Validation(format!(
            "GSTIN '{}' must be 15 characters long",
            gstin
        )));
    }

    if !gstin.chars().take(2).all(|c| c.is_ascii_digit()) {
        return Err(BillingError::Validation(format!(
            "GSTIN '{}' must start with a two-digit state code",
            gstin
        )));
    }

    if !gstin
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return Err(BillingError::Validation(format!(
            "GSTIN '{}' can only contain digits and upper-case letters",
            gstin
        )));
    }

    Ok(())
}

/// Validate the customer block of a bill.
///
/// The GSTIN is free text on a bill and is not checked here; see
/// [`validate_gstin`].
pub fn validate_customer(details: &CustomerDetails) -> BillingResult<()> {
    if details.name.trim().is_empty() {
        return Err(BillingError::Validation(
            "Customer name is required".to_string(),
        ));
    }

    Ok(())
}
