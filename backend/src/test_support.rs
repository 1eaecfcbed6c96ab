//! Test utilities for the marketplace crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via the
//! `test-support` feature). Nothing here is compiled into release builds.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{PasswordHashCost, SharedClock, SigningKey};
use crate::server::ServerConfig;

/// Signing secret used by every test service graph.
pub const TEST_SIGNING_SECRET: &[u8] = b"integration-test-signing-secret";

/// Credential lifetime used by every test service graph.
pub const TEST_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Clock that only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start the clock at 2026-02-01T10:00:00Z.
    ///
    /// # Panics
    /// Never in practice; the instant is a valid calendar date.
    #[must_use]
    pub fn at_fixed_start() -> Self {
        match Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).single() {
            Some(start) => Self::new(start),
            None => panic!("fixed test start instant is ambiguous"),
        }
    }

    /// Move the clock forward by `delta`.
    ///
    /// # Panics
    /// Panics when `delta` does not fit a [`TimeDelta`].
    pub fn advance(&self, delta: Duration) {
        let step = match TimeDelta::from_std(delta) {
            Ok(step) => step,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *self.lock_clock() += step;
    }

    /// Move the clock by a signed number of seconds.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Argon2 cost small enough for fast tests.
#[must_use]
pub const fn cheap_hash_cost() -> PasswordHashCost {
    PasswordHashCost::new(1).with_memory_kib(1024)
}

/// Signing key built from [`TEST_SIGNING_SECRET`].
///
/// # Panics
/// Never in practice; the secret is non-empty.
#[must_use]
pub fn test_signing_key() -> SigningKey {
    match SigningKey::new(TEST_SIGNING_SECRET) {
        Ok(key) => key,
        Err(error) => panic!("test signing key: {error}"),
    }
}

/// Server configuration for tests: fixed secret and lifetime, cheap hashing,
/// an ephemeral loopback port and the supplied clock.
#[must_use]
pub fn test_server_config(clock: SharedClock) -> ServerConfig {
    ServerConfig::new(
        test_signing_key(),
        TEST_TOKEN_TTL,
        cheap_hash_cost(),
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
    )
    .with_clock(clock)
}

/// Shared handle to a fresh [`MutableClock`] at the fixed start instant.
#[must_use]
pub fn fixed_clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::at_fixed_start())
}
