//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use crate::types::*;

/// Storage abstraction for the billing desk
///
/// Mirrors the hosted backend's `products`, `customers`, `bills` and
/// `bill_items` tables. Any backend (remote service, SQL database, in-memory
/// demo store) can be used by implementing these methods.
#[async_trait]
pub trait BillingStorage: Send + Sync {
    /// Save a product to storage
    async fn save_product(&mut self, product: &Product) -> BillingResult<()>;

    /// Get a product by ID
    async fn get_product(&self, product_id: &str) -> BillingResult<Option<Product>>;

    /// List all products, newest first
    async fn list_products(&self) -> BillingResult<Vec<Product>>;

    /// Update an existing product
    async fn update_product(&mut self, product: &Product) -> BillingResult<()>;

    /// Delete a product
    async fn delete_product(&mut self, product_id: &str) -> BillingResult<()>;

    /// Number of products in the catalog
    async fn count_products(&self) -> BillingResult<usize>;

    /// Save a customer to storage
    async fn save_customer(&mut self, customer: &Customer) -> BillingResult<()>;

    /// Get a customer by ID
    async fn get_customer(&self, customer_id: &str) -> BillingResult<Option<Customer>>;

    /// Number of stored customers
    async fn count_customers(&self) -> BillingResult<usize>;

    /// Invoice number to assign to the next saved bill
    async fn next_invoice_number(&self) -> BillingResult<u64>;

    /// Save a bill header
    async fn save_bill(&mut self, bill: &Bill) -> BillingResult<()>;

    /// Get a bill by ID
    async fn get_bill(&self, bill_id: &str) -> BillingResult<Option<Bill>>;

    /// List all bills, newest first
    async fn list_bills(&self) -> BillingResult<Vec<Bill>>;

    /// Save the lines of a bill
    async fn save_bill_items(&mut self, items: &[BillItem]) -> BillingResult<()>;

    /// Lines of a bill in entry order
    async fn get_bill_items(&self, bill_id: &str) -> BillingResult<Vec<BillItem>>;
}

/// Trait for implementing custom product validation rules
pub trait ProductValidator: Send + Sync {
    /// Validate a product before saving
    fn validate_product(&self, product: &Product) -> BillingResult<()>;

    /// Validate product deletion
    fn validate_product_deletion(&self, product_id: &str) -> BillingResult<()>;
}

/// Default product validator: non-empty name and positive price
pub struct DefaultProductValidator;

impl ProductValidator for DefaultProductValidator {
    fn validate_product(&self, product: &Product) -> BillingResult<()> {
        crate::utils::validate_product_name(&product.name)?;
        crate::utils::validate_positive_price(&product.price)
    }

    fn validate_product_deletion(&self, _product_id: &str) -> BillingResult<()> {
        // Bill items keep their own description and price, so deleting a
        // product never invalidates history
        Ok(())
    }
}
