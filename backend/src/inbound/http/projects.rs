//! Project API handlers.
//!
//! ```text
//! GET|POST /api/v1/projects
//! GET|PUT|PATCH|DELETE /api/v1/projects/{project_id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    Choices, Description, Error, NewProject, Project, ProjectChanges, ProjectId, ProjectName,
    ProjectType, Submission, UserId, validation_error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SignedIn;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, UpdateMode, parse_choice, reject_read_only, require,
};

const NAME: FieldName = FieldName::new("name");
const DESCRIPTION: FieldName = FieldName::new("description");
const TYPE: FieldName = FieldName::new("type");

/// Project as rendered to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[schema(example = 1)]
    pub id: i64,
    /// Identifier of the creating user.
    #[schema(format = Uuid)]
    pub author: String,
    #[schema(example = "Website")]
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    #[schema(example = "back-end")]
    pub project_type: String,
    pub created_time: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.get(),
            author: project.author.to_string(),
            name: project.name.as_ref().to_owned(),
            description: project.description.as_ref().to_owned(),
            project_type: project.project_type.value().to_owned(),
            created_time: project.created_time,
        }
    }
}

/// Create or update payload. `id`, `author` and `createdTime` are
/// assigned by the server.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    #[schema(example = "back-end")]
    pub project_type: Option<String>,
    #[schema(value_type = Option<Object>, read_only)]
    pub id: Option<Value>,
    #[schema(value_type = Option<Object>, read_only)]
    pub author: Option<Value>,
    #[schema(value_type = Option<Object>, read_only)]
    pub created_time: Option<Value>,
}

fn name(raw: String) -> Result<ProjectName, Error> {
    ProjectName::new(raw).map_err(|err| validation_error(&err))
}

fn description(raw: String) -> Result<Description, Error> {
    Description::new(raw).map_err(|err| validation_error(&err))
}

fn project_type(raw: String) -> Result<ProjectType, Error> {
    parse_choice(&raw)
}

impl ProjectRequest {
    fn check_read_only(&self) -> Result<(), Error> {
        reject_read_only(&[
            (FieldName::new("id"), &self.id),
            (FieldName::new("author"), &self.author),
            (FieldName::new("createdTime"), &self.created_time),
        ])
    }

    fn into_new_project(self) -> Result<NewProject, Error> {
        self.check_read_only()?;
        Ok(NewProject {
            name: name(require(self.name, NAME)?)?,
            description: description(require(self.description, DESCRIPTION)?)?,
            project_type: project_type(require(self.project_type, TYPE)?)?,
        })
    }

    fn into_changes(self, mode: UpdateMode) -> Result<ProjectChanges, Error> {
        self.check_read_only()?;
        Ok(ProjectChanges {
            name: mode.field(self.name, NAME)?.map(name).transpose()?,
            description: mode
                .field(self.description, DESCRIPTION)?
                .map(description)
                .transpose()?,
            project_type: mode
                .field(self.project_type, TYPE)?
                .map(project_type)
                .transpose()?,
        })
    }
}

/// Projects the caller contributes to, ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    responses(
        (status = 200, description = "Member projects", body = [ProjectResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "listProjects"
)]
#[get("/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    caller: SignedIn,
) -> ApiResult<web::Json<Vec<ProjectResponse>>> {
    let projects = state.projects.list(&caller).await?;
    Ok(web::Json(
        projects.into_iter().map(ProjectResponse::from).collect(),
    ))
}

/// Create a project; the caller becomes its author and first contributor.
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    caller: SignedIn,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<HttpResponse> {
    let project = payload.into_inner().into_new_project()?;
    let created = state.projects.create(&caller, project).await?;
    Ok(HttpResponse::Created().json(ProjectResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}",
    params(("project_id" = i64, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project", body = ProjectResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a contributor", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "getProject"
)]
#[get("/projects/{project_id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ProjectResponse>> {
    let project = state
        .projects
        .get(&caller, ProjectId::new(path.into_inner()))
        .await?;
    Ok(web::Json(project.into()))
}

async fn update_project(
    state: &HttpState,
    caller: &UserId,
    id: i64,
    payload: ProjectRequest,
    mode: UpdateMode,
) -> ApiResult<web::Json<ProjectResponse>> {
    let changes = Submission::from(payload.into_changes(mode));
    let project = state
        .projects
        .update(caller, ProjectId::new(id), changes)
        .await?;
    Ok(web::Json(project.into()))
}

/// Replace a project's editable fields. Reserved to the author.
#[utoipa::path(
    put,
    path = "/api/v1/projects/{project_id}",
    params(("project_id" = i64, Path, description = "Project identifier")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = ProjectResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a contributor or not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "replaceProject"
)]
#[put("/projects/{project_id}")]
pub async fn replace_project(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<i64>,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<web::Json<ProjectResponse>> {
    update_project(
        &state,
        &caller,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Replace,
    )
    .await
}

/// Change some of a project's fields. Reserved to the author.
#[utoipa::path(
    patch,
    path = "/api/v1/projects/{project_id}",
    params(("project_id" = i64, Path, description = "Project identifier")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = ProjectResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a contributor or not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "patchProject"
)]
#[patch("/projects/{project_id}")]
pub async fn patch_project(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<i64>,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<web::Json<ProjectResponse>> {
    update_project(
        &state,
        &caller,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Merge,
    )
    .await
}

/// Delete a project and everything beneath it. Reserved to the author.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{project_id}",
    params(("project_id" = i64, Path, description = "Project identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not a contributor or not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projects/{project_id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .projects
        .delete(&caller, ProjectId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
