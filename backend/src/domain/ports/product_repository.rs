//! Port abstraction for product persistence adapters.

use async_trait::async_trait;

use crate::domain::Product;

/// Persistence errors raised by product repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductPersistenceError {
    /// Query or mutation failed during execution.
    #[error("product repository query failed: {message}")]
    Query {
        /// Adapter diagnostic.
        message: String,
    },
}

impl ProductPersistenceError {
    /// Convenience constructor for [`ProductPersistenceError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Driven port for product storage.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a newly created product.
    async fn insert(&self, product: &Product) -> Result<(), ProductPersistenceError>;

    /// Return every stored product in insertion order.
    async fn list(&self) -> Result<Vec<Product>, ProductPersistenceError>;
}
