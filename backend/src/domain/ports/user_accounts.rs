//! Driving port for the user directory.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, Submission, User, UserChanges, UserId};

/// Registration and profile management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create an account. The only operation open to anonymous callers.
    async fn register(&self, user: NewUser) -> Result<User, Error>;

    /// Every account, ordered by username.
    async fn list(&self, caller: &UserId) -> Result<Vec<User>, Error>;

    /// One account. Profiles are readable by every signed-in user, so the
    /// caller is only recorded in the trace.
    async fn get(&self, caller: &UserId, id: &UserId) -> Result<User, Error>;

    /// Edit an account; only its owner may do so.
    async fn update(
        &self,
        caller: &UserId,
        id: &UserId,
        changes: Submission<UserChanges>,
    ) -> Result<User, Error>;

    /// Delete an account; only its owner may do so.
    async fn delete(&self, caller: &UserId, id: &UserId) -> Result<(), Error>;
}
