//! Account registration, profile management and password login.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{LoginService, UserAccounts, UserPersistenceError, UserRepository};
use crate::domain::{
    Error, LoginCredentials, NewUser, Password, PasswordHash, Submission, User, UserChanges,
    UserId, ensure_minimum_age, validation_error,
};

/// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_password(password: Password) -> Result<PasswordHash, Error> {
    tokio::task::spawn_blocking(move || password.hash())
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateUsername => {
            Error::invalid_request("a user with that username already exists")
                .with_details(json!({ "field": "username", "code": "duplicate" }))
        }
    }
}

/// Domain service backing the [`UserAccounts`] port.
#[derive(Clone)]
pub struct UserAccountService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserAccountService {
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    fn check_age(&self, user: &User) -> Result<(), Error> {
        let today = self.clock.utc().date_naive();
        ensure_minimum_age(user.date_birth, today).map_err(|err| validation_error(&err))
    }

    async fn find(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    fn ensure_self(caller: &UserId, target: &User) -> Result<(), Error> {
        if caller == &target.id {
            return Ok(());
        }
        warn!(caller = %caller, user_id = %target.id, "refused to modify another account");
        Err(Error::forbidden("you may only modify your own account")
            .with_details(json!({ "code": "not_owner" })))
    }
}

#[async_trait]
impl UserAccounts for UserAccountService {
    async fn register(&self, user: NewUser) -> Result<User, Error> {
        let (user, password) = user.into_user(UserId::random());
        self.check_age(&user)?;
        let hash = hash_password(password).await?;
        self.users
            .insert(&user, &hash)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    async fn list(&self, caller: &UserId) -> Result<Vec<User>, Error> {
        debug!(caller = %caller, "listing users");
        self.users.list().await.map_err(map_user_persistence_error)
    }

    async fn get(&self, caller: &UserId, id: &UserId) -> Result<User, Error> {
        debug!(caller = %caller, user_id = %id, "reading user");
        self.find(id).await
    }

    async fn update(
        &self,
        caller: &UserId,
        id: &UserId,
        changes: Submission<UserChanges>,
    ) -> Result<User, Error> {
        let mut user = self.find(id).await?;
        Self::ensure_self(caller, &user)?;
        let changes = changes.open()?;
        let birth_changed = changes.date_birth.is_some();
        let password = user.apply(changes);
        if birth_changed {
            self.check_age(&user)?;
        }
        let hash = match password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };
        self.users
            .update(&user, hash)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    async fn delete(&self, caller: &UserId, id: &UserId) -> Result<(), Error> {
        let user = self.find(id).await?;
        Self::ensure_self(caller, &user)?;
        self.users
            .delete(id)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

/// [`LoginService`] verifying Argon2 hashes held by a [`UserRepository`].
#[derive(Clone)]
pub struct PasswordLoginService {
    users: Arc<dyn UserRepository>,
}

impl PasswordLoginService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl LoginService for PasswordLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_persistence_error)?;
        let verified = match stored {
            Some(stored) => {
                let candidate = credentials.clone();
                let hash = stored.password_hash;
                let matches =
                    tokio::task::spawn_blocking(move || hash.verify(candidate.password()))
                        .await
                        .map_err(|err| {
                            Error::internal(format!("password verification task failed: {err}"))
                        })?;
                matches.then_some(stored.user_id)
            }
            None => None,
        };
        verified.ok_or_else(|| {
            warn!(username = credentials.username(), "login rejected");
            Error::unauthorized("invalid credentials")
        })
    }
}

#[cfg(test)]
mod tests;
