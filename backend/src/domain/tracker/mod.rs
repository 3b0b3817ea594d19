//! Project tracker use-cases.
//!
//! Every operation follows the same skeleton: resolve the parent chain by
//! primary key (project, then issue, then comment, each scoped to its
//! parent), evaluate the authorization gate against the resolved target,
//! validate cross-entity references, then perform a single store call.
//! Lookups answer `not_found` before the gate answers `forbidden`.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::warn;

use crate::domain::authorization::{Requirement, Resource, authorize};
use crate::domain::ports::{
    CommentRepository, ContributorRepository, IssueRepository, ProjectRepository,
    TrackerPersistenceError, UserRepository,
};
use crate::domain::user_account_service::map_user_persistence_error;
use crate::domain::{
    Comment, CommentId, Error, Issue, IssueId, Project, ProjectId, ProjectMembers, UserId,
};

mod comments;
mod contributors;
mod issues;
mod projects;

pub(crate) fn map_tracker_persistence_error(error: TrackerPersistenceError) -> Error {
    match error {
        TrackerPersistenceError::Connection { message } => Error::service_unavailable(message),
        TrackerPersistenceError::Query { message } => Error::internal(message),
        TrackerPersistenceError::DuplicateContributor => {
            Error::invalid_request("user is already a contributor of this project")
                .with_details(json!({ "field": "user", "code": "duplicate" }))
        }
        TrackerPersistenceError::MissingReference { entity } => {
            Error::invalid_request(format!("referenced {entity} does not exist"))
                .with_details(json!({ "field": entity, "code": "unknown_reference" }))
        }
    }
}

/// Repositories the tracker reads and writes.
#[derive(Clone)]
pub struct TrackerRepositories {
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub contributors: Arc<dyn ContributorRepository>,
    pub issues: Arc<dyn IssueRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

/// Domain service implementing [`ProjectWorkspace`], [`ContributorRoster`],
/// [`IssueBoard`] and [`CommentThread`].
///
/// [`ProjectWorkspace`]: crate::domain::ports::ProjectWorkspace
/// [`ContributorRoster`]: crate::domain::ports::ContributorRoster
/// [`IssueBoard`]: crate::domain::ports::IssueBoard
/// [`CommentThread`]: crate::domain::ports::CommentThread
#[derive(Clone)]
pub struct TrackerService {
    users: Arc<dyn UserRepository>,
    projects: Arc<dyn ProjectRepository>,
    contributors: Arc<dyn ContributorRepository>,
    issues: Arc<dyn IssueRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl TrackerService {
    pub fn new(repositories: TrackerRepositories, clock: Arc<dyn Clock>) -> Self {
        let TrackerRepositories {
            users,
            projects,
            contributors,
            issues,
            comments,
        } = repositories;
        Self {
            users,
            projects,
            contributors,
            issues,
            comments,
            clock,
        }
    }

    async fn project(&self, id: ProjectId) -> Result<Project, Error> {
        self.projects
            .find_by_id(id)
            .await
            .map_err(map_tracker_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("project {id} not found")))
    }

    async fn issue(&self, project: &Project, id: IssueId) -> Result<Issue, Error> {
        self.issues
            .find(project.id, id)
            .await
            .map_err(map_tracker_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("issue {id} not found in project {}", project.id)))
    }

    async fn comment(&self, issue: &Issue, id: CommentId) -> Result<Comment, Error> {
        self.comments
            .find(issue.id, id)
            .await
            .map_err(map_tracker_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("comment {id} not found in issue {}", issue.id)))
    }

    async fn members(&self, project: ProjectId) -> Result<ProjectMembers, Error> {
        let contributors = self
            .contributors
            .list(project)
            .await
            .map_err(map_tracker_persistence_error)?;
        Ok(ProjectMembers::new(project, &contributors))
    }

    /// Load the owning project's members and evaluate `requirement`.
    async fn gate(
        &self,
        caller: &UserId,
        resource: Resource<'_>,
        requirement: Requirement,
    ) -> Result<(), Error> {
        let members = self.members(resource.owning_project()).await?;
        authorize(caller, resource, &members, requirement).map_err(|denied| {
            warn!(
                caller = %caller,
                project_id = %resource.owning_project(),
                reason = %denied,
                "authorization denied"
            );
            Error::from(denied)
        })
    }

    /// Confirm `user` exists before it is referenced from `field`.
    async fn ensure_user(&self, user: &UserId, field: &'static str) -> Result<(), Error> {
        let found = self
            .users
            .find_by_id(user)
            .await
            .map_err(map_user_persistence_error)?;
        if found.is_some() {
            return Ok(());
        }
        Err(Error::invalid_request(format!("user {user} does not exist"))
            .with_details(json!({ "field": field, "code": "unknown_user" })))
    }
}

#[cfg(test)]
mod tests;
