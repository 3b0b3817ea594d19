//! Domain primitives, aggregates and use-cases.
//!
//! Purpose: define strongly typed entities for users, projects, contributors,
//! issues and comments, the authorization gate that guards them, and the
//! services behind the driving ports. Types here never depend on Actix or
//! Diesel; inbound and outbound adapters translate at the edges.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Entity types and their validated field newtypes.
//! - `authorization`: the membership and authorship predicates.
//! - `Submission`: request input validated only after the gate passes.
//! - `ports`: driving and driven port traits.
//! - `UserAccountService`, `PasswordLoginService`, `TrackerService`.

pub mod authorization;
mod auth;
mod choices;
mod comment;
mod contributor;
pub mod error;
mod issue;
pub mod ports;
mod project;
mod submission;
mod text;
mod trace_id;
mod tracker;
mod user;
mod user_account_service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, Password, PasswordHash,
    PasswordTooShort,
};
pub use self::choices::{Choice, Choices, UnknownChoice};
pub use self::comment::{Comment, CommentChanges, CommentId, NewComment};
pub use self::contributor::{Contributor, ContributorId, ProjectMembers};
pub use self::error::{
    Error, ErrorCode, ErrorValidationError, FieldViolation, TRACE_ID_HEADER, validation_error,
};
pub use self::issue::{
    ISSUE_TITLE_MAX, Issue, IssueChanges, IssueId, IssuePriority, IssueStatus, IssueTag,
    IssueTitle, NewIssue,
};
pub use self::project::{
    NewProject, PROJECT_NAME_MAX, Project, ProjectChanges, ProjectId, ProjectName, ProjectType,
};
pub use self::submission::Submission;
pub use self::text::{Description, TextViolation};
pub use self::trace_id::TraceId;
pub use self::tracker::{TrackerRepositories, TrackerService};
pub use self::user::{
    MINIMUM_AGE, NewUser, PERSON_NAME_MAX, PersonName, USERNAME_MAX, User, UserChanges, UserId,
    UserValidationError, Username, age_on, ensure_minimum_age,
};
pub use self::user_account_service::{PasswordLoginService, UserAccountService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use issue_tracker::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
