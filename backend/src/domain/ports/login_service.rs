//! Driving ports for account registration and login.
//!
//! Inbound adapters call these traits without knowing the backing
//! infrastructure, so HTTP handler tests can substitute doubles.

use async_trait::async_trait;

use crate::domain::{Credential, Error, LoginCredentials, RegistrationDetails, User};

/// Successful login: the bearer credential plus the authenticated user.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Credential to replay on protected calls.
    pub credential: Credential,
    /// The authenticated user.
    pub user: User,
}

/// Domain use-case port for registration.
///
/// Registration does not log the user in; no credential is issued.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create a new identity.
    async fn register(&self, details: &RegistrationDetails) -> Result<User, Error>;
}

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and mint a bearer credential.
    ///
    /// Unknown emails and wrong passwords fail identically.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;
}
