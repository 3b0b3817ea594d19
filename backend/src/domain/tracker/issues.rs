use async_trait::async_trait;
use tracing::info;

use super::{TrackerService, map_tracker_persistence_error};
use crate::domain::authorization::{Requirement, Resource};
use crate::domain::ports::IssueBoard;
use crate::domain::{Error, Issue, IssueChanges, IssueId, NewIssue, ProjectId, Submission, UserId};

#[async_trait]
impl IssueBoard for TrackerService {
    async fn list(&self, caller: &UserId, project: ProjectId) -> Result<Vec<Issue>, Error> {
        let project = self.project(project).await?;
        self.gate(caller, Resource::Project(&project), Requirement::Member)
            .await?;
        self.issues
            .list(project.id)
            .await
            .map_err(map_tracker_persistence_error)
    }

    async fn create(
        &self,
        caller: &UserId,
        project: ProjectId,
        issue: Submission<NewIssue>,
    ) -> Result<Issue, Error> {
        let project = self.project(project).await?;
        self.gate(caller, Resource::Project(&project), Requirement::Member)
            .await?;
        let issue = issue.open()?;
        if let Some(assignee) = &issue.assignee {
            self.ensure_user(assignee, "assignee").await?;
        }
        let created = self
            .issues
            .create(project.id, caller, &issue, self.clock.utc())
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(
            caller = %caller,
            project_id = %project.id,
            issue_id = %created.id,
            "issue created"
        );
        Ok(created)
    }

    async fn get(&self, caller: &UserId, project: ProjectId, id: IssueId) -> Result<Issue, Error> {
        let project = self.project(project).await?;
        let issue = self.issue(&project, id).await?;
        self.gate(caller, Resource::Issue(&issue), Requirement::Member)
            .await?;
        Ok(issue)
    }

    async fn update(
        &self,
        caller: &UserId,
        project: ProjectId,
        id: IssueId,
        changes: Submission<IssueChanges>,
    ) -> Result<Issue, Error> {
        let project = self.project(project).await?;
        let mut issue = self.issue(&project, id).await?;
        self.gate(caller, Resource::Issue(&issue), Requirement::Author)
            .await?;
        let changes = changes.open()?;
        if let Some(assignee) = changes.assigned_user() {
            self.ensure_user(assignee, "assignee").await?;
        }
        issue.apply(changes);
        self.issues
            .update(&issue)
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(caller = %caller, project_id = %project.id, issue_id = %id, "issue updated");
        Ok(issue)
    }

    async fn delete(&self, caller: &UserId, project: ProjectId, id: IssueId) -> Result<(), Error> {
        let project = self.project(project).await?;
        let issue = self.issue(&project, id).await?;
        self.gate(caller, Resource::Issue(&issue), Requirement::Author)
            .await?;
        self.issues
            .delete(id)
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(caller = %caller, project_id = %project.id, issue_id = %id, "issue deleted");
        Ok(())
    }
}
