//! Comments attached to an issue.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::issue::IssueId;
use super::text::Description;
use super::user::UserId;

/// Opaque, unguessable comment identifier (random UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Draw a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Stored comment. `issue` and `author` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub issue: IssueId,
    pub author: UserId,
    pub description: Description,
    pub created_time: DateTime<Utc>,
}

/// Client-editable fields for a new comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub description: Description,
}

/// Comment edits; `None` leaves the body untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentChanges {
    pub description: Option<Description>,
}

impl Comment {
    pub fn apply(&mut self, changes: CommentChanges) {
        if let Some(description) = changes.description {
            self.description = description;
        }
    }
}
