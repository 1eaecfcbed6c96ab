//! Port abstraction for user persistence adapters and their errors.
//!
//! Uniqueness of usernames and emails is the adapter's responsibility; the
//! domain only reacts to [`UserPersistenceError::Duplicate`].

use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId, UserRecord};

/// Identity field that must be unique across all users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueUserField {
    /// The public handle.
    Username,
    /// The login email.
    Email,
}

impl UniqueUserField {
    /// Request field name matching the HTTP payload.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Another user already holds the value of a unique field.
    #[error("user {} already exists", .field.as_str())]
    Duplicate {
        /// Field whose value is already taken.
        field: UniqueUserField,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter diagnostic.
        message: String,
    },
}

impl UserPersistenceError {
    /// Convenience constructor for [`UserPersistenceError::Duplicate`].
    #[must_use]
    pub fn duplicate(field: UniqueUserField) -> Self {
        Self::Duplicate { field }
    }

    /// Convenience constructor for [`UserPersistenceError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Driven port for identity storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new identity, failing with `Duplicate` on a uniqueness clash.
    async fn insert(&self, record: &UserRecord) -> Result<(), UserPersistenceError>;

    /// Fetch the stored identity (including password hash) for a login email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
