//! In-process store implementing every repository port.
//!
//! Used when no database is configured and by the HTTP test-suites. It
//! mirrors the PostgreSQL schema's guarantees: unique usernames and
//! memberships, foreign-key checks on insert, cascading deletes along the
//! ownership chain, and `SET NULL` for assignees of deleted accounts.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{
    Comment, Contributor, Issue, IssueId, PasswordHash, Project, ProjectId, TrackerRepositories,
    User, UserId,
};

mod repositories;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, StoredUser>,
    projects: BTreeMap<i64, Project>,
    contributors: BTreeMap<i64, Contributor>,
    issues: BTreeMap<i64, Issue>,
    /// Insertion order breaks creation-time ties.
    comments: Vec<Comment>,
    last_project_id: i64,
    last_contributor_id: i64,
    last_issue_id: i64,
}

impl Tables {
    fn next_project_id(&mut self) -> i64 {
        self.last_project_id += 1;
        self.last_project_id
    }

    fn next_contributor_id(&mut self) -> i64 {
        self.last_contributor_id += 1;
        self.last_contributor_id
    }

    fn next_issue_id(&mut self) -> i64 {
        self.last_issue_id += 1;
        self.last_issue_id
    }

    fn delete_issues(&mut self, doomed: impl Fn(&Issue) -> bool) {
        let removed: Vec<IssueId> = self
            .issues
            .values()
            .filter(|issue| doomed(issue))
            .map(|issue| issue.id)
            .collect();
        self.issues.retain(|_, issue| !removed.contains(&issue.id));
        self.comments.retain(|comment| !removed.contains(&comment.issue));
    }

    fn delete_project(&mut self, id: ProjectId) {
        self.projects.remove(&id.get());
        self.contributors.retain(|_, entry| entry.project != id);
        self.delete_issues(|issue| issue.project == id);
    }

    fn delete_user(&mut self, id: &UserId) {
        self.users.remove(id);
        let authored: Vec<ProjectId> = self
            .projects
            .values()
            .filter(|project| &project.author == id)
            .map(|project| project.id)
            .collect();
        for project in authored {
            self.delete_project(project);
        }
        self.contributors.retain(|_, entry| &entry.user != id);
        self.delete_issues(|issue| &issue.author == id);
        self.comments.retain(|comment| &comment.author != id);
        for issue in self.issues.values_mut() {
            if issue.assignee.as_ref() == Some(id) {
                issue.assignee = None;
            }
        }
    }
}

/// Shared, thread-safe tables behind every repository port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every tracker repository port, backed by these tables.
    pub fn tracker_repositories(&self) -> TrackerRepositories {
        TrackerRepositories {
            users: Arc::new(self.clone()),
            projects: Arc::new(self.clone()),
            contributors: Arc::new(self.clone()),
            issues: Arc::new(self.clone()),
            comments: Arc::new(self.clone()),
        }
    }

    fn read_tables(&self) -> Result<RwLockReadGuard<'_, Tables>, String> {
        self.inner
            .read()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    fn write_tables(&self) -> Result<RwLockWriteGuard<'_, Tables>, String> {
        self.inner
            .write()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}
