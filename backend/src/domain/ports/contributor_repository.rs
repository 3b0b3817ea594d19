//! Port for project membership persistence.

use async_trait::async_trait;

use crate::domain::{Contributor, ContributorId, ProjectId, UserId};

use super::TrackerPersistenceError;

/// Membership storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContributorRepository: Send + Sync {
    /// Memberships of `project`, ordered by id.
    async fn list(&self, project: ProjectId) -> Result<Vec<Contributor>, TrackerPersistenceError>;

    /// Record a membership. Fails with `DuplicateContributor` if it exists.
    async fn add(
        &self,
        project: ProjectId,
        user: &UserId,
    ) -> Result<Contributor, TrackerPersistenceError>;

    /// Fetch a membership scoped to `project`.
    async fn find(
        &self,
        project: ProjectId,
        id: ContributorId,
    ) -> Result<Option<Contributor>, TrackerPersistenceError>;

    /// Delete a membership.
    async fn remove(&self, id: ContributorId) -> Result<(), TrackerPersistenceError>;
}
