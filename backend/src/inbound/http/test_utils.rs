//! Shared wiring for HTTP handler tests.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use super::state::HttpState;
use crate::domain::{SharedClock, TokenService, UserId};
use crate::server::build_http_state;
use crate::test_support::{TEST_TOKEN_TTL, test_server_config, test_signing_key};

/// Production service graph over in-memory adapters with a cheap hashing cost.
pub struct TestHarness {
    state: web::Data<HttpState>,
    tokens: TokenService,
}

impl TestHarness {
    pub fn new() -> Self {
        let clock: SharedClock = Arc::new(DefaultClock);
        let state = build_http_state(&test_server_config(Arc::clone(&clock))).expect("state");
        Self {
            state: web::Data::new(state),
            tokens: TokenService::new(&test_signing_key(), TEST_TOKEN_TTL, clock),
        }
    }

    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    /// Mint a credential for `user` without going through login.
    ///
    /// Credentials are stateless, so one signed with the same key verifies
    /// against the harness gate.
    pub fn credential_for(&self, user: &UserId) -> String {
        self.tokens
            .issue(user)
            .expect("issue credential")
            .credential
            .into()
    }
}
