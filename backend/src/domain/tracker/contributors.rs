use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::{TrackerService, map_tracker_persistence_error};
use crate::domain::authorization::{Requirement, Resource};
use crate::domain::ports::ContributorRoster;
use crate::domain::{Contributor, ContributorId, Error, ProjectId, Submission, UserId};
use crate::domain::user_account_service::map_user_persistence_error;

#[async_trait]
impl ContributorRoster for TrackerService {
    async fn list(&self, caller: &UserId, project: ProjectId) -> Result<Vec<Contributor>, Error> {
        let project = self.project(project).await?;
        self.gate(caller, Resource::Project(&project), Requirement::Member)
            .await?;
        self.contributors
            .list(project.id)
            .await
            .map_err(map_tracker_persistence_error)
    }

    async fn add(
        &self,
        caller: &UserId,
        project: ProjectId,
        user: Submission<UserId>,
    ) -> Result<Contributor, Error> {
        let project = self.project(project).await?;
        self.gate(caller, Resource::Project(&project), Requirement::Author)
            .await?;
        let user = &user.open()?;
        self.users
            .find_by_id(user)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {user} not found")))?;
        let contributor = self
            .contributors
            .add(project.id, user)
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(
            caller = %caller,
            project_id = %project.id,
            user_id = %user,
            "contributor added"
        );
        Ok(contributor)
    }

    async fn remove(
        &self,
        caller: &UserId,
        project: ProjectId,
        id: ContributorId,
    ) -> Result<(), Error> {
        let project = self.project(project).await?;
        let contributor = self
            .contributors
            .find(project.id, id)
            .await
            .map_err(map_tracker_persistence_error)?
            .ok_or_else(|| {
                Error::not_found(format!("contributor {id} not found in project {}", project.id))
            })?;
        self.gate(caller, Resource::Project(&project), Requirement::Author)
            .await?;
        if contributor.user == project.author {
            return Err(
                Error::invalid_request("the project author cannot be removed")
                    .with_details(json!({ "field": "user", "code": "cannot_remove_author" })),
            );
        }
        self.contributors
            .remove(id)
            .await
            .map_err(map_tracker_persistence_error)?;
        info!(
            caller = %caller,
            project_id = %project.id,
            user_id = %contributor.user,
            "contributor removed"
        );
        Ok(())
    }
}
