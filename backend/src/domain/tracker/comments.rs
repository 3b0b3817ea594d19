use async_trait::async_trait;
use tracing::info;

use super::{TrackerService, map_tracker_persistence_error};
use crate::domain::authorization::{Requirement, Resource};
use crate::domain::ports::CommentThread;
use crate::domain::{
    Comment, CommentChanges, CommentId, Error, IssueId, NewComment, ProjectId, Submission,
    UserId,
};

#[async_trait]
impl CommentThread for TrackerService {
    async fn list(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
    ) -> Result<Vec<Comment>, Error> {
        let project = self.project(project).await?;
        let issue = self.issue(&project, issue).await?;
        self.gate(caller, Resource::Issue(&issue), Requirement::Member)
            .await?;
        self.comments
            .list(issue.id)
            .await
            .map_err(map_tracker_persistence_error)
    }

    async fn create(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
        comment: Submission<NewComment>,
    ) -> Result<Comment, Error> {
        let project = self.project(project).await?;
        let issue = self.issue(&project, issue).await?;
        self.gate(caller, Resource::Issue(&issue), Requirement::Member)
            .await?;
        let comment = comment.open()?;
        let created = Comment {
            id: CommentId::generate(),
            issue: issue.id,
            author: caller.clone(),
            description: comment.description,
            created_time: self.clock.utc(),
        };
        self.comments
            .insert(&created)
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(
            caller = %caller,
            issue_id = %issue.id,
            comment_id = %created.id,
            "comment created"
        );
        Ok(created)
    }

    async fn get(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
        id: CommentId,
    ) -> Result<Comment, Error> {
        let project = self.project(project).await?;
        let issue = self.issue(&project, issue).await?;
        let comment = self.comment(&issue, id).await?;
        self.gate(
            caller,
            Resource::Comment {
                issue: &issue,
                comment: &comment,
            },
            Requirement::Member,
        )
        .await?;
        Ok(comment)
    }

    async fn update(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
        id: CommentId,
        changes: Submission<CommentChanges>,
    ) -> Result<Comment, Error> {
        let project = self.project(project).await?;
        let issue = self.issue(&project, issue).await?;
        let mut comment = self.comment(&issue, id).await?;
        self.gate(
            caller,
            Resource::Comment {
                issue: &issue,
                comment: &comment,
            },
            Requirement::Author,
        )
        .await?;
        comment.apply(changes.open()?);
        self.comments
            .update(&comment)
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(caller = %caller, issue_id = %issue.id, comment_id = %id, "comment updated");
        Ok(comment)
    }

    async fn delete(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
        id: CommentId,
    ) -> Result<(), Error> {
        let project = self.project(project).await?;
        let issue = self.issue(&project, issue).await?;
        let comment = self.comment(&issue, id).await?;
        self.gate(
            caller,
            Resource::Comment {
                issue: &issue,
                comment: &comment,
            },
            Requirement::Author,
        )
        .await?;
        self.comments
            .delete(id)
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(caller = %caller, issue_id = %issue.id, comment_id = %id, "comment deleted");
        Ok(())
    }
}
