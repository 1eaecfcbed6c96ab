//! Driving port for browsing and listing products.

use async_trait::async_trait;

use crate::domain::{Error, NewProduct, Product, ProductListing, UserId};

/// Domain use-case port for the product catalogue.
#[async_trait]
pub trait ProductCatalogue: Send + Sync {
    /// All products with their owners, newest first.
    async fn list(&self) -> Result<Vec<ProductListing>, Error>;

    /// List a new product owned by `owner`.
    async fn create(&self, owner: &UserId, product: NewProduct) -> Result<Product, Error>;
}
