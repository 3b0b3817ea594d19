//! Project memberships.

use std::collections::HashSet;
use std::fmt;

use super::project::ProjectId;
use super::user::UserId;

/// Database-assigned membership identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContributorId(i64);

impl ContributorId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Link granting `user` access to `project`. Unique per (user, project).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    pub id: ContributorId,
    pub user: UserId,
    pub project: ProjectId,
}

/// Membership set of one project, as consulted by the authorization gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMembers {
    project: ProjectId,
    users: HashSet<UserId>,
}

impl ProjectMembers {
    /// Collect the members of `project`. Records of other projects are ignored.
    pub fn new<'a>(project: ProjectId, contributors: impl IntoIterator<Item = &'a Contributor>) -> Self {
        let users = contributors
            .into_iter()
            .filter(|contributor| contributor.project == project)
            .map(|contributor| contributor.user.clone())
            .collect();
        Self { project, users }
    }

    pub fn project(&self) -> ProjectId {
        self.project
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.users.contains(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn members_ignore_other_projects() {
        let alice = UserId::random();
        let bob = UserId::random();
        let contributors = [
            Contributor {
                id: ContributorId::new(1),
                user: alice.clone(),
                project: ProjectId::new(7),
            },
            Contributor {
                id: ContributorId::new(2),
                user: bob.clone(),
                project: ProjectId::new(8),
            },
        ];

        let members = ProjectMembers::new(ProjectId::new(7), &contributors);

        assert_eq!(members.project(), ProjectId::new(7));
        assert!(members.contains(&alice));
        assert!(!members.contains(&bob));
    }
}
