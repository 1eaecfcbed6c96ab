//! Domain primitives, services and ports.
//!
//! Purpose: keep credential handling and the access decision free of HTTP
//! and storage concerns. Inbound adapters translate requests into the
//! validated types here; outbound adapters implement [`ports`].
//!
//! Public surface:
//! - [`PasswordHasher`]: salted argon2id hashing and verification.
//! - [`TokenService`]: signed, expiring bearer credentials.
//! - [`AccessGate`]: per-request authentication decision.
//! - [`AccountService`] and [`ProductCatalogueService`]: use-cases behind the
//!   driving ports.
//! - [`Error`] and [`ErrorCode`]: API error payload.

pub mod access;
pub mod accounts;
pub mod auth;
pub mod error;
pub mod listings;
pub mod password;
pub mod ports;
pub mod product;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::access::{AccessGate, Identity, Rejection, RequestContext};
pub use self::accounts::AccountService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, RegistrationDetails};
pub use self::error::{Error, ErrorCode};
pub use self::listings::ProductCatalogueService;
pub use self::password::{HashedSecret, PasswordHashCost, PasswordHashError, PasswordHasher};
pub use self::product::{
    NewProduct, OwnerSummary, Product, ProductId, ProductListing, ProductValidationError,
};
pub use self::token::{
    Claims, Credential, EmptySigningKey, IssuedCredential, SharedClock, SigningKey, TokenError,
    TokenIssueError, TokenService,
};
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, User, UserId, UserRecord, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use marketplace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("authentication required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
