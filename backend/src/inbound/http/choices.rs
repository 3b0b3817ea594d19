//! Enumeration lookups so clients can render selectors without hard-coding
//! values.
//!
//! ```text
//! GET /api/v1/choices/projects
//! GET /api/v1/choices/issues
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Choices, IssuePriority, IssueStatus, IssueTag, ProjectType};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ChoiceSchema, ErrorSchema};
use crate::inbound::http::session::SignedIn;

fn members<C: Choices>() -> Vec<ChoiceSchema> {
    C::choices().into_iter().map(ChoiceSchema::from).collect()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProjectChoices {
    #[serde(rename = "type")]
    pub project_type: Vec<ChoiceSchema>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueChoices {
    pub status: Vec<ChoiceSchema>,
    pub priority: Vec<ChoiceSchema>,
    pub tag: Vec<ChoiceSchema>,
}

#[utoipa::path(
    get,
    path = "/api/v1/choices/projects",
    responses(
        (status = 200, description = "Project enumerations", body = ProjectChoices),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["choices"],
    operation_id = "projectChoices"
)]
#[get("/choices/projects")]
pub async fn project_choices(_caller: SignedIn) -> ApiResult<web::Json<ProjectChoices>> {
    Ok(web::Json(ProjectChoices {
        project_type: members::<ProjectType>(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/choices/issues",
    responses(
        (status = 200, description = "Issue enumerations", body = IssueChoices),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["choices"],
    operation_id = "issueChoices"
)]
#[get("/choices/issues")]
pub async fn issue_choices(_caller: SignedIn) -> ApiResult<web::Json<IssueChoices>> {
    Ok(web::Json(IssueChoices {
        status: members::<IssueStatus>(),
        priority: members::<IssuePriority>(),
        tag: members::<IssueTag>(),
    }))
}
