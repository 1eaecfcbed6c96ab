//! Marketplace credential and access-control service.
//!
//! The library exposes the domain (password hashing, bearer tokens, the
//! access gate and the account/product use-cases), the HTTP adapter and the
//! in-memory persistence adapters. [`server`] wires them into an Actix
//! application, which the `marketplace` binary binds and runs.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
