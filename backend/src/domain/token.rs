//! Bearer credential issuance and verification.
//!
//! Credentials are HS256 JSON Web Tokens carrying `{sub, iat, exp}`. Nothing
//! is stored server-side: a credential is valid while its signature matches
//! the process signing key and the injected clock reads earlier than `exp`.
//! Revocation is not supported.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::UserId;

/// Shared clock handle injected into time-dependent services.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Process-wide secret used to sign and verify credentials.
///
/// Loaded once at startup and never rotated while the process runs.
#[derive(Clone)]
pub struct SigningKey(Zeroizing<Vec<u8>>);

/// Raised when a signing key cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("signing key must not be empty")]
pub struct EmptySigningKey;

impl SigningKey {
    /// Wrap raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, EmptySigningKey> {
        let secret = Zeroizing::new(bytes.into());
        if secret.is_empty() {
            return Err(EmptySigningKey);
        }
        Ok(Self(secret))
    }

    /// Length of the secret in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; construction rejects empty secrets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({} bytes)", self.len())
    }
}

/// Claims embedded in every credential. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity the credential was issued to.
    pub sub: String,
    /// Issuance time.
    pub iat: i64,
    /// Expiry time; the credential is rejected from this instant on.
    pub exp: i64,
}

impl Claims {
    /// Identity reference carried by the credential.
    pub fn identity(&self) -> Result<UserId, TokenError> {
        UserId::new(&self.sub).map_err(|_| TokenError::Malformed)
    }
}

/// Opaque, self-verifying bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// The encoded credential as sent in `Authorization: Bearer <credential>`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Credential> for String {
    fn from(value: Credential) -> Self {
        value.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Freshly minted credential together with the claims it encodes.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    /// Encoded credential handed to the client.
    pub credential: Credential,
    /// Claims embedded in `credential`.
    pub claims: Claims,
}

/// Reasons a presented credential is refused.
///
/// Callers surface all of these uniformly as "unauthorized"; the variants
/// exist for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The credential could not be parsed.
    #[error("credential is malformed")]
    Malformed,
    /// The signature does not match the signing key.
    #[error("credential signature does not match")]
    BadSignature,
    /// The credential is past its expiry.
    #[error("credential has expired")]
    Expired,
}

impl TokenError {
    /// Stable snake-case label for logs.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
        }
    }
}

/// Failures while minting a credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenIssueError {
    /// The configured time-to-live does not fit the claim timestamps.
    #[error("credential time-to-live is out of range")]
    TtlOutOfRange,
    /// The encoder rejected the claims.
    #[error("credential encoding failed: {message}")]
    Encoding {
        /// Encoder diagnostic.
        message: String,
    },
}

/// Mints and verifies credentials with the process signing key.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use marketplace::domain::{SigningKey, TokenService, UserId};
/// use mockable::DefaultClock;
///
/// let key = SigningKey::new(b"example-secret".to_vec()).unwrap();
/// let tokens = TokenService::new(&key, Duration::from_secs(3600), Arc::new(DefaultClock));
/// let user = UserId::random();
/// let issued = tokens.issue(&user).unwrap();
/// let claims = tokens.verify(issued.credential.as_str()).unwrap();
/// assert_eq!(claims.identity().unwrap(), user);
/// ```
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: SharedClock,
}

impl TokenService {
    /// Build a service signing with `key` and issuing credentials valid for `ttl`.
    #[must_use]
    pub fn new(key: &SigningKey, ttl: Duration, clock: SharedClock) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock instead.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validation,
            ttl,
            clock,
        }
    }

    /// Mint a credential for `identity`, valid from now until now + ttl.
    pub fn issue(&self, identity: &UserId) -> Result<IssuedCredential, TokenIssueError> {
        let ttl = i64::try_from(self.ttl.as_secs()).map_err(|_| TokenIssueError::TtlOutOfRange)?;
        let iat = self.clock.utc().timestamp();
        let exp = iat.checked_add(ttl).ok_or(TokenIssueError::TtlOutOfRange)?;
        let claims = Claims {
            sub: identity.to_string(),
            iat,
            exp,
        };
        let encoded = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenIssueError::Encoding {
                message: err.to_string(),
            })?;
        Ok(IssuedCredential {
            credential: Credential(encoded),
            claims,
        })
    }

    /// Validate a presented credential and return its claims.
    ///
    /// The signature is checked before expiry, so a tampered credential is
    /// reported as such even when it is also stale.
    pub fn verify(&self, credential: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(credential, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?;
        let claims = data.claims;
        claims.identity()?;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
