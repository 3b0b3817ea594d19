//! PostgreSQL-backed `IssueRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IssueRepository, TrackerPersistenceError};
use crate::domain::{Choices, Issue, IssueId, NewIssue, ProjectId, UserId};

use super::diesel_error_mapping::{map_tracker_diesel_error, map_tracker_pool_error};
use super::models::{IssueRow, IssueUpdate, NewIssueRow};
use super::pool::DbPool;
use super::schema::issues;

#[derive(Clone)]
pub struct DieselIssueRepository {
    pool: DbPool,
}

impl DieselIssueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_issue(row: IssueRow) -> Result<Issue, TrackerPersistenceError> {
    Issue::try_from(row)
        .map_err(|message| TrackerPersistenceError::query(format!("corrupt issue row: {message}")))
}

#[async_trait]
impl IssueRepository for DieselIssueRepository {
    async fn create(
        &self,
        project: ProjectId,
        author: &UserId,
        issue: &NewIssue,
        created_time: DateTime<Utc>,
    ) -> Result<Issue, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        let row: IssueRow = diesel::insert_into(issues::table)
            .values(&NewIssueRow {
                project_id: project.get(),
                author_id: *author.as_uuid(),
                assignee_id: issue.assignee.as_ref().map(|user| *user.as_uuid()),
                title: issue.title.as_ref(),
                description: issue.description.as_ref(),
                status: issue.status.value(),
                priority: issue.priority.value(),
                tag: issue.tag.value(),
                created_time,
            })
            .returning(IssueRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_tracker_diesel_error)?;
        row_to_issue(row)
    }

    async fn find(
        &self,
        project: ProjectId,
        id: IssueId,
    ) -> Result<Option<Issue>, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        issues::table
            .filter(issues::id.eq(id.get()))
            .filter(issues::project_id.eq(project.get()))
            .select(IssueRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_tracker_diesel_error)?
            .map(row_to_issue)
            .transpose()
    }

    async fn list(&self, project: ProjectId) -> Result<Vec<Issue>, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        let rows: Vec<IssueRow> = issues::table
            .filter(issues::project_id.eq(project.get()))
            .select(IssueRow::as_select())
            .order((issues::created_time.desc(), issues::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_tracker_diesel_error)?;
        rows.into_iter().map(row_to_issue).collect()
    }

    async fn update(&self, issue: &Issue) -> Result<(), TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        diesel::update(issues::table.find(issue.id.get()))
            .set(&IssueUpdate::from_issue(issue))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_tracker_diesel_error)
    }

    async fn delete(&self, id: IssueId) -> Result<(), TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        diesel::delete(issues::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_tracker_diesel_error)
    }
}
