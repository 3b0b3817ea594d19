//! PostgreSQL-backed `ContributorRepository`.
//!
//! The `(user_id, project_id)` unique constraint rejects concurrent duplicate
//! adds; the violation surfaces as `DuplicateContributor`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContributorRepository, TrackerPersistenceError};
use crate::domain::{Contributor, ContributorId, ProjectId, UserId};

use super::diesel_error_mapping::{map_tracker_diesel_error, map_tracker_pool_error};
use super::models::{ContributorRow, NewContributorRow};
use super::pool::DbPool;
use super::schema::contributors;

#[derive(Clone)]
pub struct DieselContributorRepository {
    pool: DbPool,
}

impl DieselContributorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContributorRepository for DieselContributorRepository {
    async fn list(&self, project: ProjectId) -> Result<Vec<Contributor>, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        let rows: Vec<ContributorRow> = contributors::table
            .filter(contributors::project_id.eq(project.get()))
            .select(ContributorRow::as_select())
            .order(contributors::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_tracker_diesel_error)?;
        Ok(rows.into_iter().map(Contributor::from).collect())
    }

    async fn add(
        &self,
        project: ProjectId,
        user: &UserId,
    ) -> Result<Contributor, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        diesel::insert_into(contributors::table)
            .values(&NewContributorRow {
                user_id: *user.as_uuid(),
                project_id: project.get(),
            })
            .returning(ContributorRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Contributor::from)
            .map_err(map_tracker_diesel_error)
    }

    async fn find(
        &self,
        project: ProjectId,
        id: ContributorId,
    ) -> Result<Option<Contributor>, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        contributors::table
            .filter(contributors::id.eq(id.get()))
            .filter(contributors::project_id.eq(project.get()))
            .select(ContributorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(Contributor::from))
            .map_err(map_tracker_diesel_error)
    }

    async fn remove(&self, id: ContributorId) -> Result<(), TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        diesel::delete(contributors::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_tracker_diesel_error)
    }
}
