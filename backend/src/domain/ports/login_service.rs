//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing the backing infrastructure, so
//! handler tests can substitute a double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    ///
    /// Unknown usernames and wrong passwords both yield `unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
