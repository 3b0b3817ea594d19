//! Issue API handlers.
//!
//! ```text
//! GET|POST /api/v1/projects/{project_id}/issues
//! GET|PUT|PATCH|DELETE /api/v1/projects/{project_id}/issues/{issue_id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    Choices, Description, Error, Issue, IssueChanges, IssueId, IssuePriority, IssueStatus,
    IssueTag, IssueTitle, NewIssue, ProjectId, Submission, UserId, validation_error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SignedIn;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, UpdateMode, deserialize_some, parse_choice, parse_uuid, reject_read_only, require,
};

const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const STATUS: FieldName = FieldName::new("status");
const PRIORITY: FieldName = FieldName::new("priority");
const TAG: FieldName = FieldName::new("tag");
const ASSIGNEE: FieldName = FieldName::new("assignee");

/// Issue as rendered to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    pub id: i64,
    pub project: i64,
    #[schema(format = Uuid)]
    pub author: String,
    /// `null` when nobody is assigned.
    #[schema(format = Uuid)]
    pub assignee: Option<String>,
    pub title: String,
    pub description: String,
    #[schema(example = "to_do")]
    pub status: String,
    #[schema(example = "high")]
    pub priority: String,
    #[schema(example = "bug")]
    pub tag: String,
    pub created_time: DateTime<Utc>,
}

impl From<Issue> for IssueResponse {
    fn from(issue: Issue) -> Self {
        Self {
            id: issue.id.get(),
            project: issue.project.get(),
            author: issue.author.to_string(),
            assignee: issue.assignee.map(|user| user.to_string()),
            title: issue.title.as_ref().to_owned(),
            description: issue.description.as_ref().to_owned(),
            status: issue.status.value().to_owned(),
            priority: issue.priority.value().to_owned(),
            tag: issue.tag.value().to_owned(),
            created_time: issue.created_time,
        }
    }
}

/// Create or update payload.
///
/// On create `status` defaults to `to_do` and `assignee` may be omitted. A
/// partial update distinguishes an omitted `assignee` (unchanged) from an
/// explicit `null` (unassign); a full update treats omission as `null`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub tag: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub assignee: Option<Option<String>>,
    #[schema(value_type = Option<Object>, read_only)]
    pub id: Option<Value>,
    #[schema(value_type = Option<Object>, read_only)]
    pub project: Option<Value>,
    #[schema(value_type = Option<Object>, read_only)]
    pub author: Option<Value>,
    #[schema(value_type = Option<Object>, read_only)]
    pub created_time: Option<Value>,
}

fn title(raw: String) -> Result<IssueTitle, Error> {
    IssueTitle::new(raw).map_err(|err| validation_error(&err))
}

fn description(raw: String) -> Result<Description, Error> {
    Description::new(raw).map_err(|err| validation_error(&err))
}

fn choice<C: Choices>(raw: String) -> Result<C, Error> {
    parse_choice(&raw)
}

fn assignee(raw: Option<String>) -> Result<Option<UserId>, Error> {
    raw.map(|raw| parse_uuid(&raw, ASSIGNEE).map(UserId::from_uuid))
        .transpose()
}

impl IssueRequest {
    fn check_read_only(&self) -> Result<(), Error> {
        reject_read_only(&[
            (FieldName::new("id"), &self.id),
            (FieldName::new("project"), &self.project),
            (FieldName::new("author"), &self.author),
            (FieldName::new("createdTime"), &self.created_time),
        ])
    }

    fn into_new_issue(self) -> Result<NewIssue, Error> {
        self.check_read_only()?;
        Ok(NewIssue {
            title: title(require(self.title, TITLE)?)?,
            description: description(require(self.description, DESCRIPTION)?)?,
            status: self
                .status
                .map(choice::<IssueStatus>)
                .transpose()?
                .unwrap_or_default(),
            priority: choice(require(self.priority, PRIORITY)?)?,
            tag: choice(require(self.tag, TAG)?)?,
            assignee: assignee(self.assignee.flatten())?,
        })
    }

    fn into_changes(self, mode: UpdateMode) -> Result<IssueChanges, Error> {
        self.check_read_only()?;
        let assignment = match (mode, self.assignee) {
            (UpdateMode::Replace, None) => Some(None),
            (_, supplied) => supplied,
        };
        Ok(IssueChanges {
            title: mode.field(self.title, TITLE)?.map(title).transpose()?,
            description: mode
                .field(self.description, DESCRIPTION)?
                .map(description)
                .transpose()?,
            status: mode
                .field(self.status, STATUS)?
                .map(choice::<IssueStatus>)
                .transpose()?,
            priority: mode
                .field(self.priority, PRIORITY)?
                .map(choice::<IssuePriority>)
                .transpose()?,
            tag: mode.field(self.tag, TAG)?.map(choice::<IssueTag>).transpose()?,
            assignee: assignment.map(assignee).transpose()?,
        })
    }
}

/// Issues of a project, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/issues",
    params(("project_id" = i64, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Issues", body = [IssueResponse]),
        (status = 403, description = "Not a contributor", body = ErrorSchema),
        (status = 404, description = "Project not found", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "listIssues"
)]
#[get("/projects/{project_id}/issues")]
pub async fn list_issues(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<IssueResponse>>> {
    let issues = state
        .issues
        .list(&caller, ProjectId::new(path.into_inner()))
        .await?;
    Ok(web::Json(issues.into_iter().map(IssueResponse::from).collect()))
}

/// File an issue. Any contributor may do so and becomes its author.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/issues",
    params(("project_id" = i64, Path, description = "Project identifier")),
    request_body = IssueRequest,
    responses(
        (status = 201, description = "Issue created", body = IssueResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a contributor", body = ErrorSchema),
        (status = 404, description = "Project not found", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "createIssue"
)]
#[post("/projects/{project_id}/issues")]
pub async fn create_issue(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<i64>,
    payload: web::Json<IssueRequest>,
) -> ApiResult<HttpResponse> {
    let issue = Submission::from(payload.into_inner().into_new_issue());
    let created = state
        .issues
        .create(&caller, ProjectId::new(path.into_inner()), issue)
        .await?;
    Ok(HttpResponse::Created().json(IssueResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier")
    ),
    responses(
        (status = 200, description = "Issue", body = IssueResponse),
        (status = 403, description = "Not a contributor", body = ErrorSchema),
        (status = 404, description = "Not found in this project", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "getIssue"
)]
#[get("/projects/{project_id}/issues/{issue_id}")]
pub async fn get_issue(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64)>,
) -> ApiResult<web::Json<IssueResponse>> {
    let (project, id) = path.into_inner();
    let issue = state
        .issues
        .get(&caller, ProjectId::new(project), IssueId::new(id))
        .await?;
    Ok(web::Json(issue.into()))
}

async fn update_issue(
    state: &HttpState,
    caller: &UserId,
    (project, id): (i64, i64),
    payload: IssueRequest,
    mode: UpdateMode,
) -> ApiResult<web::Json<IssueResponse>> {
    let changes = Submission::from(payload.into_changes(mode));
    let issue = state
        .issues
        .update(caller, ProjectId::new(project), IssueId::new(id), changes)
        .await?;
    Ok(web::Json(issue.into()))
}

/// Replace an issue's editable fields. Reserved to the issue author.
#[utoipa::path(
    put,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier")
    ),
    request_body = IssueRequest,
    responses(
        (status = 200, description = "Updated issue", body = IssueResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a contributor or not the author", body = ErrorSchema),
        (status = 404, description = "Not found in this project", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "replaceIssue"
)]
#[put("/projects/{project_id}/issues/{issue_id}")]
pub async fn replace_issue(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64)>,
    payload: web::Json<IssueRequest>,
) -> ApiResult<web::Json<IssueResponse>> {
    update_issue(
        &state,
        &caller,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Replace,
    )
    .await
}

/// Change some of an issue's fields. Reserved to the issue author.
#[utoipa::path(
    patch,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier")
    ),
    request_body = IssueRequest,
    responses(
        (status = 200, description = "Updated issue", body = IssueResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a contributor or not the author", body = ErrorSchema),
        (status = 404, description = "Not found in this project", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "patchIssue"
)]
#[patch("/projects/{project_id}/issues/{issue_id}")]
pub async fn patch_issue(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64)>,
    payload: web::Json<IssueRequest>,
) -> ApiResult<web::Json<IssueResponse>> {
    update_issue(
        &state,
        &caller,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Merge,
    )
    .await
}

/// Delete an issue and its comments. Reserved to the issue author.
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not a contributor or not the author", body = ErrorSchema),
        (status = 404, description = "Not found in this project", body = ErrorSchema)
    ),
    tags = ["issues"],
    operation_id = "deleteIssue"
)]
#[delete("/projects/{project_id}/issues/{issue_id}")]
pub async fn delete_issue(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (project, id) = path.into_inner();
    state
        .issues
        .delete(&caller, ProjectId::new(project), IssueId::new(id))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
