//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MARKETPLACE_*` environment variables and an
//! optional config file. They are resolved once at startup into the types the
//! domain consumes and never change afterwards.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{PasswordHashCost, SigningKey};

const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3600;
const DEFAULT_PASSWORD_HASH_COST: u32 = 2;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
/// Minimum signing secret length accepted by release builds.
pub const SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing secret and warn.
    Debug,
    /// Release builds require an explicit, sufficiently long secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use marketplace::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while resolving configuration.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// No signing secret was configured and an ephemeral one is not allowed.
    #[error(
        "no signing secret configured; set MARKETPLACE_JWT_SECRET or MARKETPLACE_JWT_SECRET_FILE"
    )]
    MissingSecret,
    /// Reading the secret file failed.
    #[error("failed to read signing secret at {path}: {source}")]
    SecretRead {
        /// Configured secret file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for release builds.
    #[error("signing secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        /// Length of the configured secret.
        length: usize,
        /// Minimum accepted length.
        min_len: usize,
    },
    /// Credential lifetime must be positive.
    #[error("token_ttl_seconds must be greater than zero")]
    InvalidTokenTtl,
    /// Hashing cost must be at least one iteration.
    #[error("password_hash_cost must be at least 1")]
    InvalidPasswordHashCost,
    /// The bind address did not parse.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        /// Rejected input.
        value: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Configuration values for the marketplace service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct MarketplaceSettings {
    /// Signing secret for bearer credentials.
    pub jwt_secret: Option<String>,
    /// File holding the signing secret; used when `jwt_secret` is unset.
    pub jwt_secret_file: Option<PathBuf>,
    /// Allow a random per-process secret when none is configured.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    /// Credential lifetime in seconds.
    pub token_ttl_seconds: Option<u64>,
    /// Argon2 iteration count.
    pub password_hash_cost: Option<u32>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
}

impl MarketplaceSettings {
    /// Credential lifetime, defaulting to one hour.
    pub fn token_ttl(&self) -> Result<Duration, SettingsError> {
        match self.token_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS) {
            0 => Err(SettingsError::InvalidTokenTtl),
            seconds => Ok(Duration::from_secs(seconds)),
        }
    }

    /// Password hashing cost.
    pub fn password_hash_cost(&self) -> Result<PasswordHashCost, SettingsError> {
        match self.password_hash_cost.unwrap_or(DEFAULT_PASSWORD_HASH_COST) {
            0 => Err(SettingsError::InvalidPasswordHashCost),
            iterations => Ok(PasswordHashCost::new(iterations)),
        }
    }

    /// Listen address, defaulting to `0.0.0.0:5000`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Resolve the signing key.
    ///
    /// `jwt_secret` wins over `jwt_secret_file`. With neither set, debug
    /// builds (or `allow_ephemeral_secret`) fall back to a random key, so
    /// credentials do not survive a restart.
    pub fn signing_key(&self, mode: BuildMode) -> Result<SigningKey, SettingsError> {
        let Some(secret) = self.configured_secret()? else {
            if mode.is_debug() || self.allow_ephemeral_secret {
                warn!("using temporary signing secret (dev only)");
                return ephemeral_key();
            }
            return Err(SettingsError::MissingSecret);
        };
        let length = secret.len();
        if mode == BuildMode::Release && length < SECRET_MIN_LEN {
            return Err(SettingsError::SecretTooShort {
                length,
                min_len: SECRET_MIN_LEN,
            });
        }
        SigningKey::new(secret.to_vec()).map_err(|_| SettingsError::MissingSecret)
    }

    fn configured_secret(&self) -> Result<Option<Zeroizing<Vec<u8>>>, SettingsError> {
        if let Some(secret) = self.jwt_secret.as_deref().filter(|value| !value.is_empty()) {
            return Ok(Some(Zeroizing::new(secret.as_bytes().to_vec())));
        }
        let Some(path) = &self.jwt_secret_file else {
            return Ok(None);
        };
        let bytes = Zeroizing::new(std::fs::read(path).map_err(|source| {
            SettingsError::SecretRead {
                path: path.clone(),
                source,
            }
        })?);
        let trimmed = bytes.trim_ascii_end();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(Zeroizing::new(trimmed.to_vec())))
    }
}

fn ephemeral_key() -> Result<SigningKey, SettingsError> {
    let mut bytes = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
    OsRng.fill_bytes(&mut bytes);
    SigningKey::new(bytes.to_vec()).map_err(|_| SettingsError::MissingSecret)
}
