//! Port for issue persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Issue, IssueId, NewIssue, ProjectId, UserId};

use super::TrackerPersistenceError;

/// Issue storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Store a new issue under `project`.
    async fn create(
        &self,
        project: ProjectId,
        author: &UserId,
        issue: &NewIssue,
        created_time: DateTime<Utc>,
    ) -> Result<Issue, TrackerPersistenceError>;

    /// Fetch an issue scoped to `project`.
    async fn find(
        &self,
        project: ProjectId,
        id: IssueId,
    ) -> Result<Option<Issue>, TrackerPersistenceError>;

    /// Issues of `project`, newest first.
    async fn list(&self, project: ProjectId) -> Result<Vec<Issue>, TrackerPersistenceError>;

    /// Persist edits to the mutable fields.
    async fn update(&self, issue: &Issue) -> Result<(), TrackerPersistenceError>;

    /// Delete an issue with its comments.
    async fn delete(&self, id: IssueId) -> Result<(), TrackerPersistenceError>;
}
