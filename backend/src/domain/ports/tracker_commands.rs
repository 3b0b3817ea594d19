//! Driving ports for projects, memberships, issues and comments.
//!
//! Every operation takes the authenticated caller explicitly. Parent
//! identifiers are passed alongside the target so implementations can resolve
//! the ownership chain and answer `not_found` for mismatched parents.
//! Request input arrives as a [`Submission`] and is opened after the gate,
//! so lookups and permissions are reported before field errors.

use async_trait::async_trait;

use crate::domain::{
    Comment, CommentChanges, CommentId, Contributor, ContributorId, Error, Issue, IssueChanges,
    IssueId, NewComment, NewIssue, NewProject, Project, ProjectChanges, ProjectId, Submission,
    UserId,
};

/// Project use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectWorkspace: Send + Sync {
    /// Projects the caller contributes to.
    async fn list(&self, caller: &UserId) -> Result<Vec<Project>, Error>;

    /// Create a project authored by the caller, who also becomes a contributor.
    async fn create(&self, caller: &UserId, project: NewProject) -> Result<Project, Error>;

    async fn get(&self, caller: &UserId, id: ProjectId) -> Result<Project, Error>;

    async fn update(
        &self,
        caller: &UserId,
        id: ProjectId,
        changes: Submission<ProjectChanges>,
    ) -> Result<Project, Error>;

    async fn delete(&self, caller: &UserId, id: ProjectId) -> Result<(), Error>;
}

/// Membership use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContributorRoster: Send + Sync {
    async fn list(&self, caller: &UserId, project: ProjectId) -> Result<Vec<Contributor>, Error>;

    /// Add `user` to the project; reserved to the project author.
    async fn add(
        &self,
        caller: &UserId,
        project: ProjectId,
        user: Submission<UserId>,
    ) -> Result<Contributor, Error>;

    /// Remove a membership; reserved to the project author, who cannot be removed.
    async fn remove(
        &self,
        caller: &UserId,
        project: ProjectId,
        id: ContributorId,
    ) -> Result<(), Error>;
}

/// Issue use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueBoard: Send + Sync {
    async fn list(&self, caller: &UserId, project: ProjectId) -> Result<Vec<Issue>, Error>;

    async fn create(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: Submission<NewIssue>,
    ) -> Result<Issue, Error>;

    async fn get(&self, caller: &UserId, project: ProjectId, id: IssueId) -> Result<Issue, Error>;

    async fn update(
        &self,
        caller: &UserId,
        project: ProjectId,
        id: IssueId,
        changes: Submission<IssueChanges>,
    ) -> Result<Issue, Error>;

    async fn delete(&self, caller: &UserId, project: ProjectId, id: IssueId) -> Result<(), Error>;
}

/// Comment use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentThread: Send + Sync {
    async fn list(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
    ) -> Result<Vec<Comment>, Error>;

    async fn create(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
        comment: Submission<NewComment>,
    ) -> Result<Comment, Error>;

    async fn get(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
        id: CommentId,
    ) -> Result<Comment, Error>;

    async fn update(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
        id: CommentId,
        changes: Submission<CommentChanges>,
    ) -> Result<Comment, Error>;

    async fn delete(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: IssueId,
        id: CommentId,
    ) -> Result<(), Error>;
}
