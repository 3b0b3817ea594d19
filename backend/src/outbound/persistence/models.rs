//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types
//! re-validate every field so a corrupt row surfaces as a query error.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Choices, Comment, CommentId, Contributor, ContributorId, Description, Issue, IssueId,
    IssuePriority, IssueStatus, IssueTag, IssueTitle, PersonName, Project, ProjectId,
    ProjectName, ProjectType, User, UserId, Username,
};

use super::schema::{comments, contributors, issues, projects, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_birth: NaiveDate,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub date_birth: NaiveDate,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
    pub password_hash: &'a str,
}

/// Changeset for profile edits; a `None` hash keeps the stored one.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub date_birth: NaiveDate,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
    pub password_hash: Option<&'a str>,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_user(user: &'a User, password_hash: &'a str) -> Self {
        Self {
            id: *user.id.as_uuid(),
            username: user.username.as_ref(),
            first_name: user.first_name.as_ref(),
            last_name: user.last_name.as_ref(),
            date_birth: user.date_birth,
            can_be_contacted: user.can_be_contacted,
            can_data_be_shared: user.can_data_be_shared,
            password_hash,
        }
    }
}

impl<'a> UserUpdate<'a> {
    pub(crate) fn from_user(user: &'a User, password_hash: Option<&'a str>) -> Self {
        Self {
            username: user.username.as_ref(),
            first_name: user.first_name.as_ref(),
            last_name: user.last_name.as_ref(),
            date_birth: user.date_birth,
            can_be_contacted: user.can_be_contacted,
            can_data_be_shared: user.can_data_be_shared,
            password_hash,
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            username: Username::new(row.username).map_err(|err| err.to_string())?,
            first_name: PersonName::new("firstName", row.first_name)
                .map_err(|err| err.to_string())?,
            last_name: PersonName::new("lastName", row.last_name)
                .map_err(|err| err.to_string())?,
            date_birth: row.date_birth,
            can_be_contacted: row.can_be_contacted,
            can_data_be_shared: row.can_data_be_shared,
        })
    }
}

// ---------------------------------------------------------------------------
// Projects and contributors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: i64,
    pub author_id: Uuid,
    pub name: String,
    pub description: String,
    pub project_type: String,
    pub created_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub author_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub project_type: &'static str,
    pub created_time: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = projects)]
pub(crate) struct ProjectUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub project_type: &'static str,
}

impl TryFrom<ProjectRow> for Project {
    type Error = String;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProjectId::new(row.id),
            author: UserId::from_uuid(row.author_id),
            name: ProjectName::new(row.name).map_err(|err| err.to_string())?,
            description: Description::new(row.description).map_err(|err| err.to_string())?,
            project_type: ProjectType::parse(&row.project_type).map_err(|err| err.to_string())?,
            created_time: row.created_time,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contributors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContributorRow {
    pub id: i64,
    pub user_id: Uuid,
    pub project_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contributors)]
pub(crate) struct NewContributorRow {
    pub user_id: Uuid,
    pub project_id: i64,
}

impl From<ContributorRow> for Contributor {
    fn from(row: ContributorRow) -> Self {
        Self {
            id: ContributorId::new(row.id),
            user: UserId::from_uuid(row.user_id),
            project: ProjectId::new(row.project_id),
        }
    }
}

// ---------------------------------------------------------------------------
// Issues and comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IssueRow {
    pub id: i64,
    pub project_id: i64,
    pub author_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub tag: String,
    pub created_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = issues)]
pub(crate) struct NewIssueRow<'a> {
    pub project_id: i64,
    pub author_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'static str,
    pub priority: &'static str,
    pub tag: &'static str,
    pub created_time: DateTime<Utc>,
}

/// Issue changeset; `assignee_id: None` clears the assignment.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = issues)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct IssueUpdate<'a> {
    pub assignee_id: Option<Uuid>,
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'static str,
    pub priority: &'static str,
    pub tag: &'static str,
}

impl<'a> IssueUpdate<'a> {
    pub(crate) fn from_issue(issue: &'a Issue) -> Self {
        Self {
            assignee_id: issue.assignee.as_ref().map(|user| *user.as_uuid()),
            title: issue.title.as_ref(),
            description: issue.description.as_ref(),
            status: issue.status.value(),
            priority: issue.priority.value(),
            tag: issue.tag.value(),
        }
    }
}

impl TryFrom<IssueRow> for Issue {
    type Error = String;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: IssueId::new(row.id),
            project: ProjectId::new(row.project_id),
            author: UserId::from_uuid(row.author_id),
            assignee: row.assignee_id.map(UserId::from_uuid),
            title: IssueTitle::new(row.title).map_err(|err| err.to_string())?,
            description: Description::new(row.description).map_err(|err| err.to_string())?,
            status: IssueStatus::parse(&row.status).map_err(|err| err.to_string())?,
            priority: IssuePriority::parse(&row.priority).map_err(|err| err.to_string())?,
            tag: IssueTag::parse(&row.tag).map_err(|err| err.to_string())?,
            created_time: row.created_time,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub issue_id: i64,
    pub author_id: Uuid,
    pub description: String,
    pub created_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub issue_id: i64,
    pub author_id: Uuid,
    pub description: &'a str,
    pub created_time: DateTime<Utc>,
}

impl<'a> NewCommentRow<'a> {
    pub(crate) fn from_comment(comment: &'a Comment) -> Self {
        Self {
            id: *comment.id.as_uuid(),
            issue_id: comment.issue.get(),
            author_id: *comment.author.as_uuid(),
            description: comment.description.as_ref(),
            created_time: comment.created_time,
        }
    }
}

impl TryFrom<CommentRow> for Comment {
    type Error = String;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommentId::from_uuid(row.id),
            issue: IssueId::new(row.issue_id),
            author: UserId::from_uuid(row.author_id),
            description: Description::new(row.description).map_err(|err| err.to_string())?,
            created_time: row.created_time,
        })
    }
}
