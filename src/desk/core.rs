//! Billing desk that coordinates the catalog, the bill book and the dashboard

use bigdecimal::BigDecimal;
use chrono::Datelike;
use tracing::debug;

use crate::config::BillingConfig;
use crate::desk::{dashboard_stats, BillBook, DashboardStats, ProductCatalog};
use crate::invoice::{BillDraft, BillingMode, InvoiceDocument};
use crate::traits::*;
use crate::types::*;

/// Main entry point for a shop's billing operations
pub struct BillingDesk<S: BillingStorage> {
    catalog: ProductCatalog<S>,
    bill_book: BillBook<S>,
    config: BillingConfig,
}

impl<S: BillingStorage + Clone> BillingDesk<S> {
    /// Create a desk with the default configuration
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, BillingConfig::default())
    }

    /// Create a desk with an explicit configuration
    pub fn with_config(storage: S, config: BillingConfig) -> Self {
        Self {
            catalog: ProductCatalog::new(storage.clone()),
            bill_book: BillBook::new(storage, config.clone()),
            config,
        }
    }

    /// Create a desk with a custom product validator
    pub fn with_validator(
        storage: S,
        config: BillingConfig,
        product_validator: Box<dyn ProductValidator>,
    ) -> Self {
        Self {
            catalog: ProductCatalog::with_validator(storage.clone(), product_validator),
            bill_book: BillBook::new(storage, config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Start an empty bill using the configured tax rates
    pub fn new_draft(&self, billing_mode: BillingMode) -> BillDraft {
        BillDraft::new(billing_mode).with_tax(self.config.default_tax_policy())
    }

    // Catalog operations
    /// Create a new product
    pub async fn create_product(&mut self, name: String, price: BigDecimal) -> BillingResult<Product> {
        self.catalog.create_product(name, price).await
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: &str) -> BillingResult<Option<Product>> {
        self.catalog.get_product(product_id).await
    }

    /// List all products, newest first
    pub async fn list_products(&self) -> BillingResult<Vec<Product>> {
        self.catalog.list_products().await
    }

    /// Search products by name
    pub async fn search_products(&self, term: &str) -> BillingResult<Vec<Product>> {
        self.catalog.search_products(term).await
    }

    /// Update a product
    pub async fn update_product(
        &mut self,
        product_id: &str,
        name: String,
        price: BigDecimal,
    ) -> BillingResult<Product> {
        self.catalog.update_product(product_id, name, price).await
    }

    /// Delete a product
    pub async fn delete_product(&mut self, product_id: &str) -> BillingResult<()> {
        self.catalog.delete_product(product_id).await
    }

    /// Seed the demo catalog when empty
    pub async fn seed_demo_products(&mut self) -> BillingResult<Vec<Product>> {
        self.catalog.seed_demo_products().await
    }

    /// Add a catalog product to a draft by ID
    pub async fn add_product_to_draft(
        &self,
        draft: &mut BillDraft,
        product_id: &str,
    ) -> BillingResult<()> {
        let product = self.catalog.get_product_required(product_id).await?;
        draft.add_product(&product);
        Ok(())
    }

    // Bill operations
    /// Save a bill and return its invoice
    pub async fn save_bill(
        &mut self,
        customer: CustomerDetails,
        draft: &BillDraft,
    ) -> BillingResult<InvoiceDocument> {
        self.bill_book.save_bill(customer, draft).await
    }

    /// Bill history, newest first
    pub async fn list_bills(&self) -> BillingResult<Vec<BillSummary>> {
        self.bill_book.list_bills().await
    }

    /// Search bill history by customer name or invoice number
    pub async fn search_bills(&self, term: &str) -> BillingResult<Vec<BillSummary>> {
        self.bill_book.search_bills(term).await
    }

    /// Printable document of a stored bill
    pub async fn bill_document(&self, bill_id: &str) -> BillingResult<InvoiceDocument> {
        self.bill_book.bill_document(bill_id).await
    }

    // Reporting
    /// Dashboard for the given year, or the current year when `None`
    pub async fn dashboard(&self, year: Option<i32>) -> BillingResult<DashboardStats> {
        let current_year = chrono::Utc::now().year();
        let year = year.unwrap_or(current_year);

        let storage = &self.bill_book.storage;
        let bills = storage.list_bills().await?;
        let total_products = storage.count_products().await?;
        let total_customers = storage.count_customers().await?;
        debug!(year, bills = bills.len(), "Building dashboard");

        Ok(dashboard_stats(
            &bills,
            year,
            current_year,
            total_products,
            total_customers,
        ))
    }
}
