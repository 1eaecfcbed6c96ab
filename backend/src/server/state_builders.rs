//! Construction of the service graph behind [`HttpState`].

use std::sync::Arc;

use crate::domain::ports::{LoginService, ProductCatalogue, RegistrationService};
use crate::domain::{
    AccessGate, AccountService, PasswordHashError, PasswordHasher, ProductCatalogueService,
    TokenService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{InMemoryProductRepository, InMemoryUserRepository};

use super::ServerConfig;

/// Wire adapters, services and the gate into handler state.
///
/// # Errors
/// Returns [`PasswordHashError::Parameters`] when the configured hashing cost
/// is rejected by argon2.
pub fn build_http_state(config: &ServerConfig) -> Result<HttpState, PasswordHashError> {
    let tokens = Arc::new(TokenService::new(
        &config.signing_key,
        config.token_ttl,
        Arc::clone(&config.clock),
    ));
    let hasher = Arc::new(PasswordHasher::new(config.hash_cost)?);
    let users = Arc::new(InMemoryUserRepository::new());
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&users),
        hasher,
        Arc::clone(&tokens),
        Arc::clone(&config.clock),
    )?);
    let registration: Arc<dyn RegistrationService> = accounts.clone();
    let login: Arc<dyn LoginService> = accounts;
    let products: Arc<dyn ProductCatalogue> = Arc::new(ProductCatalogueService::new(
        Arc::new(InMemoryProductRepository::new()),
        users,
        Arc::clone(&config.clock),
    ));
    Ok(HttpState::new(
        registration,
        login,
        products,
        Arc::new(AccessGate::new(tokens)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PasswordHashCost, RegistrationDetails};
    use crate::test_support::{MutableClock, test_server_config};

    #[tokio::test]
    async fn wires_registration_and_login_over_one_user_store() {
        let config = test_server_config(Arc::new(MutableClock::at_fixed_start()));
        let state = build_http_state(&config).expect("state");

        let details = RegistrationDetails::try_from_parts("alice", "a@x.com", "secret123")
            .expect("details");
        let user = state.registration.register(&details).await.expect("register");
        let credentials = crate::domain::LoginCredentials::try_from_parts("a@x.com", "secret123")
            .expect("credentials");
        let outcome = state.login.login(&credentials).await.expect("login");
        assert_eq!(outcome.user.id(), user.id());

        let header = format!("Bearer {}", outcome.credential.as_str());
        let identity = state.gate.admit(Some(&header)).expect("admitted");
        assert_eq!(identity.user_id(), user.id());
    }

    #[test]
    fn rejects_an_invalid_hash_cost() {
        let mut config = test_server_config(Arc::new(MutableClock::at_fixed_start()));
        config.hash_cost = PasswordHashCost::new(0);
        assert!(matches!(
            build_http_state(&config),
            Err(PasswordHashError::Parameters { .. })
        ));
    }
}
