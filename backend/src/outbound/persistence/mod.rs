//! Persistence adapters implementing the domain's driven ports.
//!
//! The document store itself sits outside this service; these adapters keep
//! state in process memory behind the same port contracts.

mod in_memory_product_repository;
mod in_memory_user_repository;

pub use in_memory_product_repository::InMemoryProductRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
