//! PostgreSQL-backed `CommentRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, TrackerPersistenceError};
use crate::domain::{Comment, CommentId, IssueId};

use super::diesel_error_mapping::{map_tracker_diesel_error, map_tracker_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::comments;

#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_comment(row: CommentRow) -> Result<Comment, TrackerPersistenceError> {
    Comment::try_from(row)
        .map_err(|message| TrackerPersistenceError::query(format!("corrupt comment row: {message}")))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        diesel::insert_into(comments::table)
            .values(&NewCommentRow::from_comment(comment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_tracker_diesel_error)
    }

    async fn find(
        &self,
        issue: IssueId,
        id: CommentId,
    ) -> Result<Option<Comment>, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        comments::table
            .filter(comments::id.eq(*id.as_uuid()))
            .filter(comments::issue_id.eq(issue.get()))
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_tracker_diesel_error)?
            .map(row_to_comment)
            .transpose()
    }

    async fn list(&self, issue: IssueId) -> Result<Vec<Comment>, TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::issue_id.eq(issue.get()))
            .select(CommentRow::as_select())
            .order(comments::created_time.asc())
            .load(&mut conn)
            .await
            .map_err(map_tracker_diesel_error)?;
        rows.into_iter().map(row_to_comment).collect()
    }

    async fn update(&self, comment: &Comment) -> Result<(), TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        diesel::update(comments::table.find(*comment.id.as_uuid()))
            .set(comments::description.eq(comment.description.as_ref()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_tracker_diesel_error)
    }

    async fn delete(&self, id: CommentId) -> Result<(), TrackerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_tracker_pool_error)?;
        diesel::delete(comments::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_tracker_diesel_error)
    }
}
