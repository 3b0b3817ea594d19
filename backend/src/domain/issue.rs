//! Issues filed against a project.

use std::fmt;

use chrono::{DateTime, Utc};

use super::choices::choice_enum;
use super::project::ProjectId;
use super::text::{Description, TextViolation, non_blank};
use super::user::UserId;

/// Maximum length of an issue title.
pub const ISSUE_TITLE_MAX: usize = 128;

/// Database-assigned issue identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IssueId(i64);

impl IssueId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-blank issue title of at most [`ISSUE_TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTitle(String);

impl IssueTitle {
    pub fn new(value: impl Into<String>) -> Result<Self, TextViolation> {
        non_blank("title", value.into(), Some(ISSUE_TITLE_MAX)).map(Self)
    }
}

impl AsRef<str> for IssueTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

choice_enum! {
    /// Progress of an issue.
    pub enum IssueStatus for "status" {
        ToDo => ("to_do", "To Do"),
        InProgress => ("in_progress", "In Progress"),
        Finished => ("finished", "Finished"),
    }
}

impl Default for IssueStatus {
    fn default() -> Self {
        Self::ToDo
    }
}

choice_enum! {
    /// Urgency of an issue.
    pub enum IssuePriority for "priority" {
        Low => ("low", "Low"),
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
    }
}

choice_enum! {
    /// Kind of work an issue describes.
    pub enum IssueTag for "tag" {
        Bug => ("bug", "Bug"),
        Feature => ("feature", "Feature"),
        Task => ("task", "Task"),
    }
}

/// Stored issue.
///
/// ## Invariants
/// - `project` and `author` never change after creation.
/// - `assignee`, when set, names an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: IssueId,
    pub project: ProjectId,
    pub author: UserId,
    pub assignee: Option<UserId>,
    pub title: IssueTitle,
    pub description: Description,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub tag: IssueTag,
    pub created_time: DateTime<Utc>,
}

/// Client-editable fields for a new issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub title: IssueTitle,
    pub description: Description,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub tag: IssueTag,
    pub assignee: Option<UserId>,
}

/// Issue edits; `None` leaves a field untouched.
///
/// `assignee` is doubly optional: `Some(None)` clears the assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueChanges {
    pub title: Option<IssueTitle>,
    pub description: Option<Description>,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub tag: Option<IssueTag>,
    pub assignee: Option<Option<UserId>>,
}

impl IssueChanges {
    /// The user being newly assigned, if any.
    pub fn assigned_user(&self) -> Option<&UserId> {
        self.assignee.as_ref().and_then(Option::as_ref)
    }
}

impl Issue {
    pub fn apply(&mut self, changes: IssueChanges) {
        let IssueChanges {
            title,
            description,
            status,
            priority,
            tag,
            assignee,
        } = changes;
        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
        if let Some(value) = priority {
            self.priority = value;
        }
        if let Some(value) = tag {
            self.tag = value;
        }
        if let Some(value) = assignee {
            self.assignee = value;
        }
    }
}
