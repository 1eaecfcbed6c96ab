//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AccessGate;
use crate::domain::ports::{LoginService, ProductCatalogue, RegistrationService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account creation.
    pub registration: Arc<dyn RegistrationService>,
    /// Credential exchange.
    pub login: Arc<dyn LoginService>,
    /// Product browsing and listing.
    pub products: Arc<dyn ProductCatalogue>,
    /// Gate run by [`super::auth::AuthenticatedUser`] on protected routes.
    pub gate: Arc<AccessGate>,
}

impl HttpState {
    /// Bundle the ports and the gate.
    #[must_use]
    pub fn new(
        registration: Arc<dyn RegistrationService>,
        login: Arc<dyn LoginService>,
        products: Arc<dyn ProductCatalogue>,
        gate: Arc<AccessGate>,
    ) -> Self {
        Self {
            registration,
            login,
            products,
            gate,
        }
    }
}
