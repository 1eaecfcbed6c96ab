//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{PasswordHashCost, SharedClock, SigningKey};

/// Resolved values needed to build the service graph and bind the server.
pub struct ServerConfig {
    pub(crate) signing_key: SigningKey,
    pub(crate) token_ttl: Duration,
    pub(crate) hash_cost: PasswordHashCost,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) clock: SharedClock,
}

impl ServerConfig {
    /// Construct a configuration using the system clock.
    #[must_use]
    pub fn new(
        signing_key: SigningKey,
        token_ttl: Duration,
        hash_cost: PasswordHashCost,
        bind_addr: SocketAddr,
    ) -> Self {
        Self {
            signing_key,
            token_ttl,
            hash_cost,
            bind_addr,
            clock: Arc::new(mockable::DefaultClock),
        }
    }

    /// Replace the clock used for credential timestamps and listings.
    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
