//! Port abstraction for account persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername => "username is already taken",
    }
}

/// Stored login secret for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub user_id: UserId,
    pub password_hash: PasswordHash,
}

/// Account storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `DuplicateUsername` when taken.
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch an account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the login secret registered under `username`.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    /// All accounts ordered by username.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Overwrite an account, replacing the password hash when one is given.
    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<(), UserPersistenceError>;

    /// Remove an account together with everything it authored.
    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError>;
}
