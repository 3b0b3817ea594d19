//! Project membership handlers.
//!
//! ```text
//! GET|POST /api/v1/projects/{project_id}/contributors
//! DELETE /api/v1/projects/{project_id}/contributors/{contributor_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Contributor, ContributorId, Error, ProjectId, Submission, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SignedIn;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, reject_read_only, require};

const USER: FieldName = FieldName::new("user");

/// Membership record as rendered to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributorResponse {
    pub id: i64,
    #[schema(format = Uuid)]
    pub user: String,
    pub project: i64,
}

impl From<Contributor> for ContributorResponse {
    fn from(contributor: Contributor) -> Self {
        Self {
            id: contributor.id.get(),
            user: contributor.user.to_string(),
            project: contributor.project.get(),
        }
    }
}

/// `{"user": "<uuid>"}`; the project comes from the path.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddContributorRequest {
    #[schema(format = Uuid)]
    pub user: Option<String>,
    #[schema(value_type = Option<Object>, read_only)]
    pub id: Option<Value>,
    #[schema(value_type = Option<Object>, read_only)]
    pub project: Option<Value>,
}

impl AddContributorRequest {
    fn into_user(self) -> Result<UserId, Error> {
        reject_read_only(&[
            (FieldName::new("id"), &self.id),
            (FieldName::new("project"), &self.project),
        ])?;
        let raw = require(self.user, USER)?;
        Ok(UserId::from_uuid(parse_uuid(&raw, USER)?))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/contributors",
    params(("project_id" = i64, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project members", body = [ContributorResponse]),
        (status = 403, description = "Not a contributor", body = ErrorSchema),
        (status = 404, description = "Project not found", body = ErrorSchema)
    ),
    tags = ["contributors"],
    operation_id = "listContributors"
)]
#[get("/projects/{project_id}/contributors")]
pub async fn list_contributors(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<ContributorResponse>>> {
    let contributors = state
        .contributors
        .list(&caller, ProjectId::new(path.into_inner()))
        .await?;
    Ok(web::Json(
        contributors
            .into_iter()
            .map(ContributorResponse::from)
            .collect(),
    ))
}

/// Add a user to the project. Reserved to the project author.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/contributors",
    params(("project_id" = i64, Path, description = "Project identifier")),
    request_body = AddContributorRequest,
    responses(
        (status = 201, description = "Member added", body = ContributorResponse),
        (status = 400, description = "Invalid request or already a member", body = ErrorSchema),
        (status = 403, description = "Not the project author", body = ErrorSchema),
        (status = 404, description = "Project or user not found", body = ErrorSchema)
    ),
    tags = ["contributors"],
    operation_id = "addContributor"
)]
#[post("/projects/{project_id}/contributors")]
pub async fn add_contributor(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<i64>,
    payload: web::Json<AddContributorRequest>,
) -> ApiResult<HttpResponse> {
    let user = Submission::from(payload.into_inner().into_user());
    let contributor = state
        .contributors
        .add(&caller, ProjectId::new(path.into_inner()), user)
        .await?;
    Ok(HttpResponse::Created().json(ContributorResponse::from(contributor)))
}

/// Remove a membership. Reserved to the project author, who cannot be
/// removed.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{project_id}/contributors/{contributor_id}",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("contributor_id" = i64, Path, description = "Membership identifier")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 400, description = "The author cannot be removed", body = ErrorSchema),
        (status = 403, description = "Not the project author", body = ErrorSchema),
        (status = 404, description = "Project or membership not found", body = ErrorSchema)
    ),
    tags = ["contributors"],
    operation_id = "removeContributor"
)]
#[delete("/projects/{project_id}/contributors/{contributor_id}")]
pub async fn remove_contributor(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (project, id) = path.into_inner();
    state
        .contributors
        .remove(&caller, ProjectId::new(project), ContributorId::new(id))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
