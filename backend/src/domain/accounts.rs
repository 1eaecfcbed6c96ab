//! Registration and login use-cases.
//!
//! Hashing and verification are CPU-bound, so both run on the blocking pool
//! with the caller's trace identifier carried across.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use super::ports::{
    LoginOutcome, LoginService, RegistrationService, UserPersistenceError, UserRepository,
};
use super::{
    Error, HashedSecret, LoginCredentials, PasswordHashError, PasswordHasher,
    RegistrationDetails, SharedClock, TokenService, TraceId, User, UserId, UserRecord,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account use-cases backed by a [`UserRepository`].
pub struct AccountService<U> {
    users: Arc<U>,
    hasher: Arc<PasswordHasher>,
    tokens: Arc<TokenService>,
    clock: SharedClock,
    decoy: HashedSecret,
}

impl<U> AccountService<U> {
    /// Wire the service.
    ///
    /// A decoy hash is computed up front so that logins for unknown emails
    /// still pay for one verification.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
        clock: SharedClock,
    ) -> Result<Self, PasswordHashError> {
        let decoy = hasher.hash("decoy-password")?;
        Ok(Self {
            users,
            hasher,
            tokens,
            clock,
            decoy,
        })
    }

    async fn hash_password(&self, plaintext: &str) -> Result<HashedSecret, Error> {
        let hasher = Arc::clone(&self.hasher);
        let secret = zeroize::Zeroizing::new(plaintext.to_owned());
        let trace_id = TraceId::current();
        tokio::task::spawn_blocking(move || {
            TraceId::sync_scope(trace_id, || hasher.hash(secret.as_str()))
        })
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(map_hash_error)
    }

    async fn verify_password(&self, plaintext: &str, stored: HashedSecret) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let secret = zeroize::Zeroizing::new(plaintext.to_owned());
        let trace_id = TraceId::current();
        tokio::task::spawn_blocking(move || {
            TraceId::sync_scope(trace_id, || hasher.verify(secret.as_str(), &stored))
        })
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    match error {
        PasswordHashError::InvalidInput => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "password", "code": "empty_password" })),
        PasswordHashError::Parameters { .. } | PasswordHashError::Hashing { .. } => {
            Error::internal(error.to_string())
        }
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Duplicate { field } => Error::invalid_request("user already exists")
            .with_details(json!({ "field": field.as_str(), "code": "duplicate" })),
        UserPersistenceError::Query { .. } => Error::internal(error.to_string()),
    }
}

#[async_trait]
impl<U> RegistrationService for AccountService<U>
where
    U: UserRepository + 'static,
{
    async fn register(&self, details: &RegistrationDetails) -> Result<User, Error> {
        let password_hash = self.hash_password(details.password()).await?;
        let user = User::new(
            UserId::random(),
            details.username().clone(),
            details.email().clone(),
            self.clock.utc(),
        );
        let record = UserRecord {
            user,
            password_hash,
        };
        self.users
            .insert(&record)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %record.user.id(), "user registered");
        Ok(record.user)
    }
}

#[async_trait]
impl<U> LoginService for AccountService<U>
where
    U: UserRepository + 'static,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let found = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;
        let Some(record) = found else {
            self.verify_password(credentials.password(), self.decoy.clone())
                .await?;
            debug!(reason = "unknown_email", "login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let matches = self
            .verify_password(credentials.password(), record.password_hash.clone())
            .await?;
        if !matches {
            debug!(reason = "wrong_password", "login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        let issued = self
            .tokens
            .issue(record.user.id())
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(LoginOutcome {
            credential: issued.credential,
            user: record.user,
        })
    }
}
