//! Authentication primitives: login credentials, passwords and their hashes.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};
use zeroize::Zeroizing;

use super::error::{Error, FieldViolation};

/// Minimum password length accepted for new or changed passwords.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl FieldViolation for LoginValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
        }
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use issue_tracker::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada", "hunter22").unwrap();
/// assert_eq!(creds.username(), "ada");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Password was shorter than [`PASSWORD_MIN`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password must be at least {min} characters")]
pub struct PasswordTooShort {
    pub min: usize,
}

impl FieldViolation for PasswordTooShort {
    fn field(&self) -> &'static str {
        "password"
    }

    fn code(&self) -> &'static str {
        "too_short"
    }
}

/// Plain-text password awaiting hashing. Wiped from memory on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate the minimum length.
    pub fn new(password: impl Into<String>) -> Result<Self, PasswordTooShort> {
        let password = Zeroizing::new(password.into());
        if password.chars().count() < PASSWORD_MIN {
            return Err(PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(password))
    }

    /// Borrow the secret for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Hash with Argon2id and a fresh random salt.
    pub fn hash(&self) -> Result<PasswordHash, Error> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(self.expose().as_bytes(), &salt)
            .map(|phc| PasswordHash(phc.to_string()))
            .map_err(|err| Error::internal(format!("failed to hash password: {err}")))
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Argon2 hash in PHC string format, as persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored PHC string without re-validating it.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check `candidate` against the hash. Malformed hashes never verify.
    pub fn verify(&self, candidate: &str) -> bool {
        match PhcString::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(error) => {
                tracing::warn!(%error, "stored password hash is malformed");
                false
            }
        }
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}
