//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserCredentials, UserPersistenceError, UserRepository};
use crate::domain::{PasswordHash, User, UserId};

use super::diesel_error_mapping::{map_user_diesel_error, map_user_pool_error};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of [`UserRepository`]. Deleting a user relies on
/// `ON DELETE CASCADE` to drop everything the account authored.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row)
        .map_err(|message| UserPersistenceError::query(format!("corrupt user row: {message}")))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let row = NewUserRow::from_user(user, password_hash.as_ref());
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_user_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?
            .map(row_to_user)
            .transpose()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let found: Option<(Uuid, String)> = users::table
            .filter(users::username.eq(username))
            .select((users::id, users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_user_diesel_error)?;
        Ok(found.map(|(id, hash)| UserCredentials {
            user_id: UserId::from_uuid(id),
            password_hash: PasswordHash::from_phc(hash),
        }))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::username.asc())
            .load(&mut conn)
            .await
            .map_err(map_user_diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        let changes = UserUpdate::from_user(user, password_hash.as_ref().map(AsRef::as_ref));
        diesel::update(users::table.find(*user.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_user_diesel_error)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_user_pool_error)?;
        diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_user_diesel_error)
    }
}
