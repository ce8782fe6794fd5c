//! In-memory storage implementation for demo mode and testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory store used when the hosted backend is unreachable ("demo mode")
///
/// Clones share the same underlying data.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    /// Newest first
    products: Arc<RwLock<Vec<Product>>>,
    customers: Arc<RwLock<HashMap<String, Customer>>>,
    /// Newest first
    bills: Arc<RwLock<Vec<Bill>>>,
    bill_items: Arc<RwLock<Vec<BillItem>>>,
}

fn poisoned<T>(_: PoisonError<T>) -> BillingError {
    BillingError::Storage("Memory storage lock poisoned".to_string())
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(Vec::new())),
            customers: Arc::new(RwLock::new(HashMap::new())),
            bills: Arc::new(RwLock::new(Vec::new())),
            bill_items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> BillingResult<()> {
        self.products.write().map_err(poisoned)?.clear();
        self.customers.write().map_err(poisoned)?.clear();
        self.bills.write().map_err(poisoned)?.clear();
        self.bill_items.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BillingStorage for MemoryStorage {
    async fn save_product(&mut self, product: &Product) -> BillingResult<()> {
        let mut products = self.products.write().map_err(poisoned)?;
        products.retain(|p| p.id != product.id);
        products.insert(0, product.clone());
        Ok(())
    }

    async fn get_product(&self, product_id: &str) -> BillingResult<Option<Product>> {
        let products = self.products.read().map_err(poisoned)?;
        Ok(products.iter().find(|p| p.id == product_id).cloned())
    }

    async fn list_products(&self) -> BillingResult<Vec<Product>> {
        Ok(self.products.read().map_err(poisoned)?.clone())
    }

    async fn update_product(&mut self, product: &Product) -> BillingResult<()> {
        let mut products = self.products.write().map_err(poisoned)?;
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(())
            }
            None => Err(BillingError::ProductNotFound(product.id.clone())),
        }
    }

    async fn delete_product(&mut self, product_id: &str) -> BillingResult<()> {
        let mut products = self.products.write().map_err(poisoned)?;
        let before = products.len();
        products.retain(|p| p.id != product_id);
        if products.len() < before {
            Ok(())
        } else {
            Err(BillingError::ProductNotFound(product_id.to_string()))
        }
    }

    async fn count_products(&self) -> BillingResult<usize> {
        Ok(self.products.read().map_err(poisoned)?.len())
    }

    async fn save_customer(&mut self, customer: &Customer) -> BillingResult<()> {
        self.customers
            .write()
            .map_err(poisoned)?
            .insert(customer.id.clone(), customer.clone());
        Ok(())
    }

    async fn get_customer(&self, customer_id: &str) -> BillingResult<Option<Customer>> {
        Ok(self
            .customers
            .read()
            .map_err(poisoned)?
            .get(customer_id)
            .cloned())
    }

    async fn count_customers(&self) -> BillingResult<usize> {
        Ok(self.customers.read().map_err(poisoned)?.len())
    }

    async fn next_invoice_number(&self) -> BillingResult<u64> {
        Ok(self.bills.read().map_err(poisoned)?.len() as u64 + 1)
    }

    async fn save_bill(&mut self, bill: &Bill) -> BillingResult<()> {
        let mut bills = self.bills.write().map_err(poisoned)?;
        bills.retain(|b| b.id != bill.id);
        bills.insert(0, bill.clone());
        Ok(())
    }

    async fn get_bill(&self, bill_id: &str) -> BillingResult<Option<Bill>> {
        let bills = self.bills.read().map_err(poisoned)?;
        Ok(bills.iter().find(|b| b.id == bill_id).cloned())
    }

    async fn list_bills(&self) -> BillingResult<Vec<Bill>> {
        Ok(self.bills.read().map_err(poisoned)?.clone())
    }

    async fn save_bill_items(&mut self, items: &[BillItem]) -> BillingResult<()> {
        self.bill_items
            .write()
            .map_err(poisoned)?
            .extend(items.iter().cloned());
        Ok(())
    }

    async fn get_bill_items(&self, bill_id: &str) -> BillingResult<Vec<BillItem>> {
        let items = self.bill_items.read().map_err(poisoned)?;
        Ok(items
            .iter()
            .filter(|item| item.bill_id == bill_id)
            .cloned()
            .collect())
    }
}
