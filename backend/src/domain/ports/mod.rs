//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`RegistrationService`, `LoginService`, `ProductCatalogue`)
//! are called by inbound adapters; driven ports (`UserRepository`,
//! `ProductRepository`) are implemented by outbound adapters.

mod login_service;
mod product_catalogue;
mod product_repository;
mod user_repository;

pub use login_service::{LoginOutcome, LoginService, RegistrationService};
pub use product_catalogue::ProductCatalogue;
pub use product_repository::{ProductPersistenceError, ProductRepository};
pub use user_repository::{UniqueUserField, UserPersistenceError, UserRepository};
