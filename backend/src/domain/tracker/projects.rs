use async_trait::async_trait;
use tracing::info;

use super::{TrackerService, map_tracker_persistence_error};
use crate::domain::authorization::{Requirement, Resource};
use crate::domain::ports::ProjectWorkspace;
use crate::domain::{Error, NewProject, Project, ProjectChanges, ProjectId, Submission, UserId};

#[async_trait]
impl ProjectWorkspace for TrackerService {
    async fn list(&self, caller: &UserId) -> Result<Vec<Project>, Error> {
        self.projects
            .list_for_member(caller)
            .await
            .map_err(map_tracker_persistence_error)
    }

    async fn create(&self, caller: &UserId, project: NewProject) -> Result<Project, Error> {
        let created = self
            .projects
            .create_with_author(caller, &project, self.clock.utc())
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(caller = %caller, project_id = %created.id, "project created");
        Ok(created)
    }

    async fn get(&self, caller: &UserId, id: ProjectId) -> Result<Project, Error> {
        let project = self.project(id).await?;
        self.gate(caller, Resource::Project(&project), Requirement::Member)
            .await?;
        Ok(project)
    }

    async fn update(
        &self,
        caller: &UserId,
        id: ProjectId,
        changes: Submission<ProjectChanges>,
    ) -> Result<Project, Error> {
        let mut project = self.project(id).await?;
        self.gate(caller, Resource::Project(&project), Requirement::Author)
            .await?;
        project.apply(changes.open()?);
        self.projects
            .update(&project)
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(caller = %caller, project_id = %id, "project updated");
        Ok(project)
    }

    async fn delete(&self, caller: &UserId, id: ProjectId) -> Result<(), Error> {
        let project = self.project(id).await?;
        self.gate(caller, Resource::Project(&project), Requirement::Author)
            .await?;
        self.projects
            .delete(id)
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(caller = %caller, project_id = %id, "project deleted");
        Ok(())
    }
}
