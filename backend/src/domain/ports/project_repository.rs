//! Port for project persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewProject, Project, ProjectId, UserId};

use super::TrackerPersistenceError;

/// Project storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Store a project and its author's membership atomically.
    ///
    /// Either both rows exist afterwards or neither does.
    async fn create_with_author(
        &self,
        author: &UserId,
        project: &NewProject,
        created_time: DateTime<Utc>,
    ) -> Result<Project, TrackerPersistenceError>;

    /// Fetch a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, TrackerPersistenceError>;

    /// Projects `user` contributes to, ordered by id.
    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Project>, TrackerPersistenceError>;

    /// Persist edits to the mutable fields.
    async fn update(&self, project: &Project) -> Result<(), TrackerPersistenceError>;

    /// Delete a project with its memberships, issues and comments.
    async fn delete(&self, id: ProjectId) -> Result<(), TrackerPersistenceError>;
}
