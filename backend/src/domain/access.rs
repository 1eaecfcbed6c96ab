//! Access-control gate for protected operations.
//!
//! Each request makes one transition: unauthenticated to either authenticated
//! (identity attached) or rejected. The gate holds no cross-request state, so
//! admitting the same unexpired credential twice gives the same identity.

use std::sync::Arc;

use tracing::debug;

use super::{TokenError, TokenService, UserId};

const BEARER_PREFIX: &str = "Bearer ";

/// Why the gate refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// No `Authorization` header was supplied.
    #[error("missing credential")]
    MissingCredential,
    /// The header was present but the credential did not verify.
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl Rejection {
    /// Stable snake-case label for logs.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Token(err) => err.reason(),
        }
    }
}

/// Identity established by a successful gate transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
}

impl Identity {
    /// Verified identity reference, used to stamp resource ownership.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

/// Per-request context carrying the identity once the gate has run.
///
/// The default value is the anonymous context of a request the gate has not
/// admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    identity: Option<Identity>,
}

impl RequestContext {
    /// Context for an admitted request.
    #[must_use]
    pub const fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Identity attached by the gate, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

/// Validates bearer credentials presented on protected calls.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use marketplace::domain::{AccessGate, Rejection, SigningKey, TokenError, TokenService};
/// use mockable::DefaultClock;
///
/// let key = SigningKey::new(b"example-secret".to_vec()).unwrap();
/// let tokens = TokenService::new(&key, Duration::from_secs(60), Arc::new(DefaultClock));
/// let gate = AccessGate::new(Arc::new(tokens));
///
/// assert_eq!(gate.admit(None), Err(Rejection::MissingCredential));
/// assert_eq!(
///     gate.admit(Some("Bearer garbage")),
///     Err(Rejection::Token(TokenError::Malformed))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct AccessGate {
    tokens: Arc<TokenService>,
}

impl AccessGate {
    /// Build a gate verifying credentials with `tokens`.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Run the gate over the raw `Authorization` header value.
    ///
    /// A header that is not of the form `Bearer <credential>` is treated as a
    /// malformed credential.
    pub fn admit(&self, authorization: Option<&str>) -> Result<Identity, Rejection> {
        let outcome = self.transition(authorization);
        if let Err(rejection) = &outcome {
            debug!(reason = rejection.reason(), "access gate rejected request");
        }
        outcome
    }

    /// Run the gate and wrap the outcome in a [`RequestContext`].
    pub fn context_for(&self, authorization: Option<&str>) -> Result<RequestContext, Rejection> {
        self.admit(authorization).map(RequestContext::authenticated)
    }

    fn transition(&self, authorization: Option<&str>) -> Result<Identity, Rejection> {
        let header = authorization.ok_or(Rejection::MissingCredential)?;
        let credential = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(TokenError::Malformed)?;
        let claims = self.tokens.verify(credential)?;
        Ok(Identity {
            user_id: claims.identity()?,
        })
    }
}
