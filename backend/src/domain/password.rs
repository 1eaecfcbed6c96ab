//! Password hashing and verification.
//!
//! Hashes are argon2id PHC strings, so the salt and cost parameters travel
//! with the hash and verification never depends on the current configuration.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::warn;

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The plaintext was empty.
    #[error("password must not be empty")]
    InvalidInput,
    /// The configured cost parameters were rejected by argon2.
    #[error("invalid password hashing parameters: {message}")]
    Parameters {
        /// Argon2 diagnostic.
        message: String,
    },
    /// Argon2 failed while computing the hash.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Argon2 diagnostic.
        message: String,
    },
}

/// Storable password hash (argon2 PHC string).
///
/// `Debug` output is redacted; the hash is not secret, but there is no reason
/// to scatter it through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret(String);

impl HashedSecret {
    /// Wrap a PHC string loaded from storage.
    #[must_use]
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// The PHC string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedSecret(..)")
    }
}

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHashCost {
    iterations: u32,
    memory_kib: u32,
}

impl PasswordHashCost {
    /// Default iteration count (argon2 `t_cost`).
    pub const DEFAULT_ITERATIONS: u32 = Params::DEFAULT_T_COST;
    /// Default memory cost in KiB (argon2 `m_cost`).
    pub const DEFAULT_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;

    /// Cost with the given iteration count and the default memory size.
    #[must_use]
    pub const fn new(iterations: u32) -> Self {
        Self {
            iterations,
            memory_kib: Self::DEFAULT_MEMORY_KIB,
        }
    }

    /// Override the memory cost.
    #[must_use]
    pub const fn with_memory_kib(mut self, memory_kib: u32) -> Self {
        self.memory_kib = memory_kib;
        self
    }

    /// Iteration count.
    #[must_use]
    pub const fn iterations(self) -> u32 {
        self.iterations
    }

    /// Memory cost in KiB.
    #[must_use]
    pub const fn memory_kib(self) -> u32 {
        self.memory_kib
    }
}

impl Default for PasswordHashCost {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ITERATIONS)
    }
}

/// Salted, deliberately slow one-way password transform.
///
/// # Examples
/// ```
/// use marketplace::domain::{PasswordHashCost, PasswordHasher};
///
/// let hasher = PasswordHasher::new(PasswordHashCost::new(1).with_memory_kib(1024)).unwrap();
/// let stored = hasher.hash("secret123").unwrap();
/// assert!(hasher.verify("secret123", &stored));
/// assert!(!hasher.verify("secret124", &stored));
/// ```
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Build a hasher for the supplied cost.
    pub fn new(cost: PasswordHashCost) -> Result<Self, PasswordHashError> {
        let params = Params::new(
            cost.memory_kib(),
            cost.iterations(),
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|err| PasswordHashError::Parameters {
            message: err.to_string(),
        })?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<HashedSecret, PasswordHashError> {
        if plaintext.is_empty() {
            return Err(PasswordHashError::InvalidInput);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hashing {
                message: err.to_string(),
            })?;
        Ok(HashedSecret(hash.to_string()))
    }

    /// Check `plaintext` against a stored hash.
    ///
    /// Mismatches and unparseable hashes both return `false`.
    #[must_use]
    pub fn verify(&self, plaintext: &str, stored: &HashedSecret) -> bool {
        let parsed = match PasswordHash::new(stored.as_str()) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, "stored password hash could not be parsed");
                return false;
            }
        };
        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(PasswordHashCost::new(1).with_memory_kib(1024)).expect("cheap params")
    }

    #[rstest]
    #[case("secret123")]
    #[case(" spaced out ")]
    #[case("ünïcødé-пароль")]
    fn verify_accepts_the_hashed_plaintext(hasher: PasswordHasher, #[case] plaintext: &str) {
        let stored = hasher.hash(plaintext).expect("hash");
        assert!(hasher.verify(plaintext, &stored));
    }

    #[rstest]
    #[case("secret123", "secret124")]
    #[case("secret123", "Secret123")]
    #[case("secret123", "secret123 ")]
    #[case("secret123", "")]
    fn verify_rejects_other_plaintexts(
        hasher: PasswordHasher,
        #[case] original: &str,
        #[case] attempt: &str,
    ) {
        let stored = hasher.hash(original).expect("hash");
        assert!(!hasher.verify(attempt, &stored));
    }

    #[rstest]
    fn hash_rejects_empty_plaintext(hasher: PasswordHasher) {
        assert_eq!(hasher.hash(""), Err(PasswordHashError::InvalidInput));
    }

    #[rstest]
    fn hashes_are_salted_and_never_contain_the_plaintext(hasher: PasswordHasher) {
        let first = hasher.hash("secret123").expect("hash");
        let second = hasher.hash("secret123").expect("hash");
        assert_ne!(first, second);
        assert!(!first.as_str().contains("secret123"));
        assert!(first.as_str().starts_with("$argon2id$"));
    }

    #[rstest]
    fn verify_uses_parameters_embedded_in_the_hash(hasher: PasswordHasher) {
        let stored = hasher.hash("secret123").expect("hash");
        let costlier = PasswordHasher::new(PasswordHashCost::new(3).with_memory_kib(2048))
            .expect("params");
        assert!(costlier.verify("secret123", &stored));
    }

    #[rstest]
    fn verify_returns_false_for_garbage_hashes(hasher: PasswordHasher) {
        assert!(!hasher.verify("secret123", &HashedSecret::from_phc("not-a-phc-string")));
    }

    #[test]
    fn zero_iterations_are_rejected() {
        let err = PasswordHasher::new(PasswordHashCost::new(0)).expect_err("invalid params");
        assert!(matches!(err, PasswordHashError::Parameters { .. }));
    }
}
