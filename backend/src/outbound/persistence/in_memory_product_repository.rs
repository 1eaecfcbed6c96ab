//! In-process `ProductRepository` adapter.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::Product;
use crate::domain::ports::{ProductPersistenceError, ProductRepository};

/// Thread-safe in-memory product store preserving insertion order.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, product: &Product) -> Result<(), ProductPersistenceError> {
        self.products
            .write()
            .map_err(|_| ProductPersistenceError::query("product store lock poisoned"))?
            .push(product.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Product>, ProductPersistenceError> {
        let products = self
            .products
            .read()
            .map_err(|_| ProductPersistenceError::query("product store lock poisoned"))?;
        Ok(products.clone())
    }
}
