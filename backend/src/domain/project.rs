//! Projects: the root of the ownership chain.

use std::fmt;

use chrono::{DateTime, Utc};

use super::choices::choice_enum;
use super::text::{Description, TextViolation, non_blank};
use super::user::UserId;

/// Maximum length of a project name.
pub const PROJECT_NAME_MAX: usize = 50;

/// Database-assigned project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(i64);

impl ProjectId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-blank project name of at most [`PROJECT_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(value: impl Into<String>) -> Result<Self, TextViolation> {
        non_blank("name", value.into(), Some(PROJECT_NAME_MAX)).map(Self)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

choice_enum! {
    /// Platform a project targets.
    pub enum ProjectType for "type" {
        BackEnd => ("back-end", "Back-end"),
        FrontEnd => ("front-end", "Front-end"),
        Ios => ("ios", "iOS"),
        Android => ("android", "Android"),
    }
}

/// Stored project.
///
/// ## Invariants
/// - `author` never changes after creation.
/// - `author` always holds a contributor record for this project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub author: UserId,
    pub name: ProjectName,
    pub description: Description,
    pub project_type: ProjectType,
    pub created_time: DateTime<Utc>,
}

/// Client-editable fields for a new project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: ProjectName,
    pub description: Description,
    pub project_type: ProjectType,
}

/// Project edits; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub name: Option<ProjectName>,
    pub description: Option<Description>,
    pub project_type: Option<ProjectType>,
}

impl Project {
    pub fn apply(&mut self, changes: ProjectChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(project_type) = changes.project_type {
            self.project_type = project_type;
        }
    }
}
