//! Port for comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, IssueId};

use super::TrackerPersistenceError;

/// Comment storage. Identifiers are minted by the domain, not the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn insert(&self, comment: &Comment) -> Result<(), TrackerPersistenceError>;

    /// Fetch a comment scoped to `issue`.
    async fn find(
        &self,
        issue: IssueId,
        id: CommentId,
    ) -> Result<Option<Comment>, TrackerPersistenceError>;

    /// Comments of `issue`, oldest first.
    async fn list(&self, issue: IssueId) -> Result<Vec<Comment>, TrackerPersistenceError>;

    async fn update(&self, comment: &Comment) -> Result<(), TrackerPersistenceError>;

    async fn delete(&self, id: CommentId) -> Result<(), TrackerPersistenceError>;
}
