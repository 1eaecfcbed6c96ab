//! Authentication inputs: registration details and login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::{EmailAddress, UserValidationError, Username};

/// Domain error returned when registration or login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username or email failed identity validation.
    #[error(transparent)]
    Identity(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl CredentialsValidationError {
    /// Name of the offending request field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Identity(
                UserValidationError::EmptyUsername
                | UserValidationError::UsernameTooLong { .. },
            ) => "username",
            Self::Identity(UserValidationError::EmptyEmail | UserValidationError::InvalidEmail) => {
                "email"
            }
            Self::Identity(UserValidationError::EmptyId | UserValidationError::InvalidId) => "id",
            Self::EmptyPassword => "password",
        }
    }

    /// Stable machine-readable reason.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Identity(UserValidationError::EmptyUsername) => "empty_username",
            Self::Identity(UserValidationError::UsernameTooLong { .. }) => "username_too_long",
            Self::Identity(UserValidationError::EmptyEmail) => "empty_email",
            Self::Identity(UserValidationError::InvalidEmail) => "invalid_email",
            Self::Identity(UserValidationError::EmptyId) => "empty_id",
            Self::Identity(UserValidationError::InvalidId) => "invalid_id",
            Self::EmptyPassword => "empty_password",
        }
    }
}

fn require_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials used by the login service.
///
/// ## Invariants
/// - `email` is normalised by [`EmailAddress`].
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons.
///
/// # Examples
/// ```
/// use marketplace::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("A@x.com", "secret123").unwrap();
/// assert_eq!(creds.email().as_ref(), "a@x.com");
/// assert_eq!(creds.password(), "secret123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: require_password(password)?,
        })
    }

    /// Email used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl RegistrationDetails {
    /// Construct registration details from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password: require_password(password)?,
        })
    }

    /// Requested username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested login email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password to be hashed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", "email", "empty_email")]
    #[case("   ", "pw", "email", "empty_email")]
    #[case("nope", "pw", "email", "invalid_email")]
    #[case("a@x.com", "", "password", "empty_password")]
    fn invalid_login_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] reason: &str,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err.field(), field);
        assert_eq!(err.reason(), reason);
    }

    #[test]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("a@x.com", "  padded  ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.password(), "  padded  ");
    }

    #[rstest]
    #[case("", "a@x.com", "secret123", "username", "empty_username")]
    #[case("\t ", "a@x.com", "secret123", "username", "empty_username")]
    #[case("alice", "", "secret123", "email", "empty_email")]
    #[case("alice", "a@x.com", "", "password", "empty_password")]
    fn invalid_registration_details(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] reason: &str,
    ) {
        let err = RegistrationDetails::try_from_parts(username, email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err.field(), field);
        assert_eq!(err.reason(), reason);
    }

    #[test]
    fn registration_accepts_display_style_usernames() {
        let details = RegistrationDetails::try_from_parts("Alice Smith", "a@x.com", "secret123")
            .expect("spaces are allowed in usernames");
        assert_eq!(details.username().as_ref(), "Alice Smith");
    }

    #[test]
    fn registration_normalises_identity_fields() {
        let details = RegistrationDetails::try_from_parts(" alice ", "A@X.com", "secret123")
            .expect("valid registration");
        assert_eq!(details.username().as_ref(), "alice");
        assert_eq!(details.email().as_ref(), "a@x.com");
        assert_eq!(details.password(), "secret123");
    }
}
