//! Authorization gate.
//!
//! Two pure predicates decide every access: membership of the project that
//! owns a resource, and authorship of the resource itself. Resources form a
//! closed set; each variant knows how to resolve its owning project, so no
//! runtime type inspection is needed.
//!
//! [`authorize`] layers the checks: membership is always evaluated first, then
//! authorship when the operation requires it.

use serde_json::json;

use super::comment::Comment;
use super::contributor::ProjectMembers;
use super::error::Error;
use super::issue::Issue;
use super::project::{Project, ProjectId};
use super::user::UserId;

/// A resource subject to access control.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Project(&'a Project),
    Issue(&'a Issue),
    /// A comment travels with its parent issue so the owning project resolves
    /// without another lookup.
    Comment {
        issue: &'a Issue,
        comment: &'a Comment,
    },
}

/// Resource family, used in denial messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Project,
    Issue,
    Comment,
}

impl ResourceKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Issue => "issue",
            Self::Comment => "comment",
        }
    }
}

impl Resource<'_> {
    /// Project at the root of this resource's ownership chain.
    pub fn owning_project(&self) -> ProjectId {
        match self {
            Self::Project(project) => project.id,
            Self::Issue(issue) => issue.project,
            Self::Comment { issue, .. } => issue.project,
        }
    }

    /// User who created this resource.
    pub fn author(&self) -> &UserId {
        match self {
            Self::Project(project) => &project.author,
            Self::Issue(issue) => &issue.author,
            Self::Comment { comment, .. } => &comment.author,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Project(_) => ResourceKind::Project,
            Self::Issue(_) => ResourceKind::Issue,
            Self::Comment { .. } => ResourceKind::Comment,
        }
    }
}

/// True iff `caller` contributes to the project owning `resource`.
///
/// A membership set of a different project never grants access.
pub fn is_member(caller: &UserId, resource: Resource<'_>, members: &ProjectMembers) -> bool {
    members.project() == resource.owning_project() && members.contains(caller)
}

/// True iff `caller` authored `resource`.
pub fn is_owner(caller: &UserId, resource: Resource<'_>) -> bool {
    resource.author() == caller
}

/// Predicate an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any contributor of the owning project.
    Member,
    /// The resource's author, who must also be a contributor.
    Author,
}

/// Why the gate refused access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("you are not a contributor of this project")]
    NotContributor,
    #[error("only the author of this {} may modify it", .kind.as_str())]
    NotAuthor { kind: ResourceKind },
}

impl AccessDenied {
    fn code(self) -> &'static str {
        match self {
            Self::NotContributor => "not_contributor",
            Self::NotAuthor { .. } => "not_author",
        }
    }
}

impl From<AccessDenied> for Error {
    fn from(value: AccessDenied) -> Self {
        Error::forbidden(value.to_string()).with_details(json!({ "code": value.code() }))
    }
}

/// Evaluate `requirement` for `caller` against `resource`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use issue_tracker::domain::authorization::{AccessDenied, Requirement, Resource, authorize};
/// use issue_tracker::domain::{
///     Contributor, ContributorId, Description, Project, ProjectId, ProjectMembers, ProjectName,
///     ProjectType, UserId,
/// };
///
/// let author = UserId::random();
/// let project = Project {
///     id: ProjectId::new(1),
///     author: author.clone(),
///     name: ProjectName::new("Website").unwrap(),
///     description: Description::new("Company site").unwrap(),
///     project_type: ProjectType::BackEnd,
///     created_time: Utc::now(),
/// };
/// let membership = Contributor { id: ContributorId::new(1), user: author.clone(), project: project.id };
/// let members = ProjectMembers::new(project.id, [&membership]);
///
/// assert!(authorize(&author, Resource::Project(&project), &members, Requirement::Author).is_ok());
/// assert_eq!(
///     authorize(&UserId::random(), Resource::Project(&project), &members, Requirement::Member),
///     Err(AccessDenied::NotContributor)
/// );
/// ```
pub fn authorize(
    caller: &UserId,
    resource: Resource<'_>,
    members: &ProjectMembers,
    requirement: Requirement,
) -> Result<(), AccessDenied> {
    if !is_member(caller, resource, members) {
        return Err(AccessDenied::NotContributor);
    }
    match requirement {
        Requirement::Member => Ok(()),
        Requirement::Author if is_owner(caller, resource) => Ok(()),
        Requirement::Author => Err(AccessDenied::NotAuthor {
            kind: resource.kind(),
        }),
    }
}
