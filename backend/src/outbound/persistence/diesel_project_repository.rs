//! PostgreSQL-backed `ProjectRepository`.
//!
//! Project creation inserts the project row and the author's membership in
//! one transaction so a project never exists without its author contributor.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ProjectRepository, TrackerPersistenceError};
use crate::domain::{Choices, NewProject, Project, ProjectId, UserId};

use super::diesel_error_mapping::{map_tracker_diesel_error, map_tracker_pool_error};
use super::models::{NewContributorRow, NewProjectRow, ProjectRow, ProjectUpdate};
use super::pool::DbPool;
use super::schema::{contributors, projects};

#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_project(row: ProjectRow) -> Result<Project, TrackerPersistenceError> {
    Project::try_from(row)
        .map_err(|message| TrackerPersistenceError::query(format!("corrupt project row: {message}")))
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn create_with_author(
        &self,
        author: &UserId,
        project: &NewProject,
        created_time: DateTime<Utc>,
    ) -> Result<Project, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        let author_id = *author.as_uuid();
        let new_row = NewProjectRow {
            author_id,
            name: project.name.as_ref(),
            description: project.description.as_ref(),
            project_type: project.project_type.value(),
            created_time,
        };

        let row = conn
            .transaction(|conn| {
                async move {
                    let row: ProjectRow = diesel::insert_into(projects::table)
                        .values(&new_row)
                        .returning(ProjectRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(contributors::table)
                        .values(&NewContributorRow {
                            user_id: author_id,
                            project_id: row.id,
                        })
                        .execute(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tracker_diesel_error)?;

        row_to_project(row)
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        projects::table
            .find(id.get())
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_tracker_diesel_error)?
            .map(row_to_project)
            .transpose()
    }

    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Project>, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        let rows: Vec<ProjectRow> = projects::table
            .inner_join(contributors::table)
            .filter(contributors::user_id.eq(*user.as_uuid()))
            .select(ProjectRow::as_select())
            .order(projects::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_tracker_diesel_error)?;
        rows.into_iter().map(row_to_project).collect()
    }

    async fn update(&self, project: &Project) -> Result<(), TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        diesel::update(projects::table.find(project.id.get()))
            .set(&ProjectUpdate {
                name: project.name.as_ref(),
                description: project.description.as_ref(),
                project_type: project.project_type.value(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_tracker_diesel_error)
    }

    async fn delete(&self, id: ProjectId) -> Result<(), TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        diesel::delete(projects::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_tracker_diesel_error)
    }
}
