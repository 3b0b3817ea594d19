//! Port implementations over [`InMemoryStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{InMemoryStore, StoredUser};
use crate::domain::ports::{
    CommentRepository, ContributorRepository, IssueRepository, ProjectRepository,
    TrackerPersistenceError, UserCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentId, Contributor, ContributorId, Issue, IssueId, NewIssue, NewProject,
    PasswordHash, Project, ProjectId, User, UserId,
};

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.write_tables().map_err(UserPersistenceError::query)?;
        if tables
            .users
            .values()
            .any(|stored| stored.user.username == user.username)
        {
            return Err(UserPersistenceError::duplicate_username());
        }
        tables.users.insert(
            user.id.clone(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.read_tables().map_err(UserPersistenceError::query)?;
        Ok(tables.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let tables = self.read_tables().map_err(UserPersistenceError::query)?;
        Ok(tables
            .users
            .values()
            .find(|stored| stored.user.username.as_ref() == username)
            .map(|stored| UserCredentials {
                user_id: stored.user.id.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.read_tables().map_err(UserPersistenceError::query)?;
        let mut users: Vec<User> = tables
            .users
            .values()
            .map(|stored| stored.user.clone())
            .collect();
        users.sort_by(|left, right| left.username.cmp(&right.username));
        Ok(users)
    }

    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<(), UserPersistenceError> {
        let mut tables = self.write_tables().map_err(UserPersistenceError::query)?;
        if tables
            .users
            .values()
            .any(|stored| stored.user.username == user.username && stored.user.id != user.id)
        {
            return Err(UserPersistenceError::duplicate_username());
        }
        if let Some(stored) = tables.users.get_mut(&user.id) {
            stored.user = user.clone();
            if let Some(hash) = password_hash {
                stored.password_hash = hash;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        let mut tables = self.write_tables().map_err(UserPersistenceError::query)?;
        tables.delete_user(id);
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create_with_author(
        &self,
        author: &UserId,
        project: &NewProject,
        created_time: DateTime<Utc>,
    ) -> Result<Project, TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        if !tables.users.contains_key(author) {
            return Err(TrackerPersistenceError::missing_reference("author"));
        }
        let id = ProjectId::new(tables.next_project_id());
        let created = Project {
            id,
            author: author.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            project_type: project.project_type,
            created_time,
        };
        tables.projects.insert(id.get(), created.clone());
        let membership = ContributorId::new(tables.next_contributor_id());
        tables.contributors.insert(
            membership.get(),
            Contributor {
                id: membership,
                user: author.clone(),
                project: id,
            },
        );
        Ok(created)
    }

    async fn find_by_id(&self, id: ProjectId) -> Result<Option<Project>, TrackerPersistenceError> {
        let tables = self.read_tables().map_err(TrackerPersistenceError::query)?;
        Ok(tables.projects.get(&id.get()).cloned())
    }

    async fn list_for_member(&self, user: &UserId) -> Result<Vec<Project>, TrackerPersistenceError> {
        let tables = self.read_tables().map_err(TrackerPersistenceError::query)?;
        Ok(tables
            .projects
            .values()
            .filter(|project| {
                tables
                    .contributors
                    .values()
                    .any(|entry| entry.project == project.id && &entry.user == user)
            })
            .cloned()
            .collect())
    }

    async fn update(&self, project: &Project) -> Result<(), TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        if let Some(stored) = tables.projects.get_mut(&project.id.get()) {
            *stored = project.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> Result<(), TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        tables.delete_project(id);
        Ok(())
    }
}

#[async_trait]
impl ContributorRepository for InMemoryStore {
    async fn list(&self, project: ProjectId) -> Result<Vec<Contributor>, TrackerPersistenceError> {
        let tables = self.read_tables().map_err(TrackerPersistenceError::query)?;
        Ok(tables
            .contributors
            .values()
            .filter(|entry| entry.project == project)
            .cloned()
            .collect())
    }

    async fn add(
        &self,
        project: ProjectId,
        user: &UserId,
    ) -> Result<Contributor, TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        if !tables.projects.contains_key(&project.get()) {
            return Err(TrackerPersistenceError::missing_reference("project"));
        }
        if !tables.users.contains_key(user) {
            return Err(TrackerPersistenceError::missing_reference("user"));
        }
        if tables
            .contributors
            .values()
            .any(|entry| entry.project == project && &entry.user == user)
        {
            return Err(TrackerPersistenceError::duplicate_contributor());
        }
        let id = ContributorId::new(tables.next_contributor_id());
        let contributor = Contributor {
            id,
            user: user.clone(),
            project,
        };
        tables.contributors.insert(id.get(), contributor.clone());
        Ok(contributor)
    }

    async fn find(
        &self,
        project: ProjectId,
        id: ContributorId,
    ) -> Result<Option<Contributor>, TrackerPersistenceError> {
        let tables = self.read_tables().map_err(TrackerPersistenceError::query)?;
        Ok(tables
            .contributors
            .get(&id.get())
            .filter(|entry| entry.project == project)
            .cloned())
    }

    async fn remove(&self, id: ContributorId) -> Result<(), TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        tables.contributors.remove(&id.get());
        Ok(())
    }
}

#[async_trait]
impl IssueRepository for InMemoryStore {
    async fn create(
        &self,
        project: ProjectId,
        author: &UserId,
        issue: &NewIssue,
        created_time: DateTime<Utc>,
    ) -> Result<Issue, TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        if !tables.projects.contains_key(&project.get()) {
            return Err(TrackerPersistenceError::missing_reference("project"));
        }
        if issue
            .assignee
            .as_ref()
            .is_some_and(|assignee| !tables.users.contains_key(assignee))
        {
            return Err(TrackerPersistenceError::missing_reference("assignee"));
        }
        let id = IssueId::new(tables.next_issue_id());
        let created = Issue {
            id,
            project,
            author: author.clone(),
            assignee: issue.assignee.clone(),
            title: issue.title.clone(),
            description: issue.description.clone(),
            status: issue.status,
            priority: issue.priority,
            tag: issue.tag,
            created_time,
        };
        tables.issues.insert(id.get(), created.clone());
        Ok(created)
    }

    async fn find(
        &self,
        project: ProjectId,
        id: IssueId,
    ) -> Result<Option<Issue>, TrackerPersistenceError> {
        let tables = self.read_tables().map_err(TrackerPersistenceError::query)?;
        Ok(tables
            .issues
            .get(&id.get())
            .filter(|issue| issue.project == project)
            .cloned())
    }

    async fn list(&self, project: ProjectId) -> Result<Vec<Issue>, TrackerPersistenceError> {
        let tables = self.read_tables().map_err(TrackerPersistenceError::query)?;
        let mut issues: Vec<Issue> = tables
            .issues
            .values()
            .filter(|issue| issue.project == project)
            .cloned()
            .collect();
        issues.sort_by(|left, right| {
            right
                .created_time
                .cmp(&left.created_time)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(issues)
    }

    async fn update(&self, issue: &Issue) -> Result<(), TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        if issue
            .assignee
            .as_ref()
            .is_some_and(|assignee| !tables.users.contains_key(assignee))
        {
            return Err(TrackerPersistenceError::missing_reference("assignee"));
        }
        if let Some(stored) = tables.issues.get_mut(&issue.id.get()) {
            *stored = issue.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: IssueId) -> Result<(), TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        tables.delete_issues(|issue| issue.id == id);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: &Comment) -> Result<(), TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        if !tables.issues.contains_key(&comment.issue.get()) {
            return Err(TrackerPersistenceError::missing_reference("issue"));
        }
        tables.comments.push(comment.clone());
        Ok(())
    }

    async fn find(
        &self,
        issue: IssueId,
        id: CommentId,
    ) -> Result<Option<Comment>, TrackerPersistenceError> {
        let tables = self.read_tables().map_err(TrackerPersistenceError::query)?;
        Ok(tables
            .comments
            .iter()
            .find(|comment| comment.id == id && comment.issue == issue)
            .cloned())
    }

    async fn list(&self, issue: IssueId) -> Result<Vec<Comment>, TrackerPersistenceError> {
        let tables = self.read_tables().map_err(TrackerPersistenceError::query)?;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|comment| comment.issue == issue)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| comment.created_time);
        Ok(comments)
    }

    async fn update(&self, comment: &Comment) -> Result<(), TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        if let Some(stored) = tables
            .comments
            .iter_mut()
            .find(|stored| stored.id == comment.id)
        {
            *stored = comment.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: CommentId) -> Result<(), TrackerPersistenceError> {
        let mut tables = self.write_tables().map_err(TrackerPersistenceError::query)?;
        tables.comments.retain(|comment| comment.id != id);
        Ok(())
    }
}
