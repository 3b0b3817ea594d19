//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`LoginService`, `UserAccounts` and the tracker use-cases) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod contributor_repository;
mod issue_repository;
mod login_service;
mod project_repository;
mod tracker_commands;
mod tracker_persistence_error;
mod user_accounts;
mod user_repository;

pub use comment_repository::CommentRepository;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use contributor_repository::ContributorRepository;
#[cfg(test)]
pub use contributor_repository::MockContributorRepository;
pub use issue_repository::IssueRepository;
#[cfg(test)]
pub use issue_repository::MockIssueRepository;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use project_repository::MockProjectRepository;
pub use project_repository::ProjectRepository;
pub use tracker_commands::{CommentThread, ContributorRoster, IssueBoard, ProjectWorkspace};
#[cfg(test)]
pub use tracker_commands::{
    MockCommentThread, MockContributorRoster, MockIssueBoard, MockProjectWorkspace,
};
pub use tracker_persistence_error::TrackerPersistenceError;
pub use user_accounts::UserAccounts;
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentials, UserPersistenceError, UserRepository};
