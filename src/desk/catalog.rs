//! Product catalog management

use bigdecimal::BigDecimal;
use tracing::{debug, info};

use crate::traits::*;
use crate::types::*;

/// Products seeded into an empty demo catalog
pub fn demo_products() -> Vec<(&'static str, i64)> {
    vec![
        ("Oil Filter", 450),
        ("Brake Pads", 1200),
        ("Engine Oil 5W-40", 3500),
    ]
}

/// Product catalog operations
pub struct ProductCatalog<S: BillingStorage> {
    pub(crate) storage: S,
    validator: Box<dyn ProductValidator>,
}

impl<S: BillingStorage> ProductCatalog<S> {
    /// Create a new catalog
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultProductValidator),
        }
    }

    /// Create a new catalog with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn ProductValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create a new product
    pub async fn create_product(&mut self, name: String, price: BigDecimal) -> BillingResult<Product> {
        let product = Product::new(name.trim().to_string(), price);
        self.validator.validate_product(&product)?;

        self.storage.save_product(&product).await?;
        debug!(id = %product.id, name = %product.name, "Created product");

        Ok(product)
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: &str) -> BillingResult<Option<Product>> {
        self.storage.get_product(product_id).await
    }

    /// Get a product by ID, returning an error if not found
    pub async fn get_product_required(&self, product_id: &str) -> BillingResult<Product> {
        self.storage
            .get_product(product_id)
            .await?
            .ok_or_else(|| BillingError::ProductNotFound(product_id.to_string()))
    }

    /// List all products, newest first
    pub async fn list_products(&self) -> BillingResult<Vec<Product>> {
        self.storage.list_products().await
    }

    /// Case-insensitive substring search on product names; a blank term lists everything
    pub async fn search_products(&self, term: &str) -> BillingResult<Vec<Product>> {
        let needle = term.trim().to_lowercase();
        let products = self.storage.list_products().await?;

        let matches: Vec<Product> = products
            .into_iter()
            .filter(|product| product.name.to_lowercase().contains(&needle))
            .collect();
        debug!(term = %term, count = matches.len(), "Searched products");

        Ok(matches)
    }

    /// Change the name and price of an existing product
    pub async fn update_product(
        &mut self,
        product_id: &str,
        name: String,
        price: BigDecimal,
    ) -> BillingResult<Product> {
        let mut product = self.get_product_required(product_id).await?;
        product.name = name.trim().to_string();
        product.price = price;

        self.validator.validate_product(&product)?;
        self.storage.update_product(&product).await?;
        debug!(id = %product.id, "Updated product");

        Ok(product)
    }

    /// Delete a product
    pub async fn delete_product(&mut self, product_id: &str) -> BillingResult<()> {
        self.validator.validate_product_deletion(product_id)?;

        if self.storage.get_product(product_id).await?.is_none() {
            return Err(BillingError::ProductNotFound(product_id.to_string()));
        }

        self.storage.delete_product(product_id).await?;
        debug!(id = %product_id, "Deleted product");
        Ok(())
    }

    /// Seed the demo products when the catalog is empty; returns the catalog
    pub async fn seed_demo_products(&mut self) -> BillingResult<Vec<Product>> {
        if self.storage.count_products().await? == 0 {
            for (name, price) in demo_products() {
                self.create_product(name.to_string(), BigDecimal::from(price))
                    .await?;
            }
            info!(count = demo_products().len(), "Seeded demo catalog");
        }

        self.list_products().await
    }
}
