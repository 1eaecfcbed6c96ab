//! In-process `UserRepository` adapter.
//!
//! Stands in for the document store: records live in a single map guarded by
//! an `RwLock`, and both uniqueness checks happen under the write lock so
//! concurrent registrations cannot slip a duplicate in between them.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{UniqueUserField, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId, UserRecord};

#[derive(Debug, Default)]
struct Store {
    by_id: HashMap<UserId, UserRecord>,
    id_by_email: HashMap<EmailAddress, UserId>,
    id_by_username: HashMap<String, UserId>,
}

/// Thread-safe in-memory identity store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>, UserPersistenceError> {
        self.store
            .read()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>, UserPersistenceError> {
        self.store
            .write()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }
}

/// Usernames compare case-insensitively so `Alice` and `alice` cannot coexist.
fn username_key(record: &UserRecord) -> String {
    record.user.username().as_ref().to_lowercase()
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, record: &UserRecord) -> Result<(), UserPersistenceError> {
        let mut store = self.write()?;
        let email = record.user.email().clone();
        let username = username_key(record);
        if store.id_by_email.contains_key(&email) {
            return Err(UserPersistenceError::duplicate(UniqueUserField::Email));
        }
        if store.id_by_username.contains_key(&username) {
            return Err(UserPersistenceError::duplicate(UniqueUserField::Username));
        }
        let id = record.user.id().clone();
        store.id_by_email.insert(email, id.clone());
        store.id_by_username.insert(username, id.clone());
        store.by_id.insert(id, record.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        let store = self.read()?;
        Ok(store
            .id_by_email
            .get(email)
            .and_then(|id| store.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let store = self.read()?;
        Ok(store.by_id.get(id).map(|record| record.user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HashedSecret, Username};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn record(username: &str, email: &str) -> UserRecord {
        UserRecord {
            user: User::new(
                UserId::random(),
                Username::new(username).expect("username"),
                EmailAddress::new(email).expect("email"),
                Utc::now(),
            ),
            password_hash: HashedSecret::from_phc("$argon2id$placeholder"),
        }
    }

    #[fixture]
    fn repo() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn stores_and_finds_records(repo: InMemoryUserRepository) {
        let alice = record("alice", "a@x.com");
        repo.insert(&alice).await.expect("insert");

        let by_email = repo
            .find_by_email(alice.user.email())
            .await
            .expect("lookup");
        assert_eq!(by_email, Some(alice.clone()));
        let by_id = repo.find_by_id(alice.user.id()).await.expect("lookup");
        assert_eq!(by_id, Some(alice.user));
    }

    #[rstest]
    #[case("alice", "other@x.com", UniqueUserField::Username)]
    #[case("ALICE", "other@x.com", UniqueUserField::Username)]
    #[case("bob", "a@x.com", UniqueUserField::Email)]
    #[tokio::test]
    async fn rejects_duplicates(
        repo: InMemoryUserRepository,
        #[case] username: &str,
        #[case] email: &str,
        #[case] field: UniqueUserField,
    ) {
        repo.insert(&record("alice", "a@x.com")).await.expect("insert");
        let err = repo
            .insert(&record(username, email))
            .await
            .expect_err("duplicate");
        assert_eq!(err, UserPersistenceError::duplicate(field));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_lookups_return_none(repo: InMemoryUserRepository) {
        let email = EmailAddress::new("ghost@x.com").expect("email");
        assert!(repo.find_by_email(&email).await.expect("lookup").is_none());
        assert!(repo
            .find_by_id(&UserId::random())
            .await
            .expect("lookup")
            .is_none());
    }
}
