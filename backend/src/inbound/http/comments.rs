//! Comment API handlers.
//!
//! ```text
//! GET|POST /api/v1/projects/{project_id}/issues/{issue_id}/comments
//! GET|PUT|PATCH|DELETE /api/v1/projects/{project_id}/issues/{issue_id}/comments/{comment_id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    Comment, CommentChanges, CommentId, Description, Error, IssueId, NewComment, ProjectId,
    Submission, UserId, validation_error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SignedIn;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, UpdateMode, parse_uuid, reject_read_only, require,
};

const DESCRIPTION: FieldName = FieldName::new("description");
const COMMENT_ID: FieldName = FieldName::new("commentId");

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[schema(format = Uuid)]
    pub id: String,
    pub issue: i64,
    #[schema(format = Uuid)]
    pub author: String,
    pub description: String,
    pub created_time: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            issue: comment.issue.get(),
            author: comment.author.to_string(),
            description: comment.description.as_ref().to_owned(),
            created_time: comment.created_time,
        }
    }
}

/// `{"description": "..."}`; everything else is assigned by the server.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub description: Option<String>,
    #[schema(value_type = Option<Object>, read_only)]
    pub id: Option<Value>,
    #[schema(value_type = Option<Object>, read_only)]
    pub issue: Option<Value>,
    #[schema(value_type = Option<Object>, read_only)]
    pub author: Option<Value>,
    #[schema(value_type = Option<Object>, read_only)]
    pub created_time: Option<Value>,
}

impl CommentRequest {
    fn description(self, mode: UpdateMode) -> Result<Option<Description>, Error> {
        reject_read_only(&[
            (FieldName::new("id"), &self.id),
            (FieldName::new("issue"), &self.issue),
            (FieldName::new("author"), &self.author),
            (FieldName::new("createdTime"), &self.created_time),
        ])?;
        mode.field(self.description, DESCRIPTION)?
            .map(|raw| Description::new(raw).map_err(|err| validation_error(&err)))
            .transpose()
    }

    fn into_new_comment(self) -> Result<NewComment, Error> {
        let description = require(self.description(UpdateMode::Replace)?, DESCRIPTION)?;
        Ok(NewComment { description })
    }
}

fn comment_path(
    (project, issue, id): (i64, i64, String),
) -> Result<(ProjectId, IssueId, CommentId), Error> {
    let id = CommentId::from_uuid(parse_uuid(&id, COMMENT_ID)?);
    Ok((ProjectId::new(project), IssueId::new(issue), id))
}

/// Comments on an issue, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}/comments",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier")
    ),
    responses(
        (status = 200, description = "Comments", body = [CommentResponse]),
        (status = 403, description = "Not a contributor", body = ErrorSchema),
        (status = 404, description = "Project or issue not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/projects/{project_id}/issues/{issue_id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64)>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let (project, issue) = path.into_inner();
    let comments = state
        .comments
        .list(&caller, ProjectId::new(project), IssueId::new(issue))
        .await?;
    Ok(web::Json(
        comments.into_iter().map(CommentResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}/comments",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a contributor", body = ErrorSchema),
        (status = 404, description = "Project or issue not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/projects/{project_id}/issues/{issue_id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64)>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let (project, issue) = path.into_inner();
    let comment = Submission::from(payload.into_inner().into_new_comment());
    let created = state
        .comments
        .create(&caller, ProjectId::new(project), IssueId::new(issue), comment)
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}/comments/{comment_id}",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Comment", body = CommentResponse),
        (status = 400, description = "Malformed comment id", body = ErrorSchema),
        (status = 403, description = "Not a contributor", body = ErrorSchema),
        (status = 404, description = "Not found under this issue", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "getComment"
)]
#[get("/projects/{project_id}/issues/{issue_id}/comments/{comment_id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64, String)>,
) -> ApiResult<web::Json<CommentResponse>> {
    let (project, issue, id) = comment_path(path.into_inner())?;
    let comment = state.comments.get(&caller, project, issue, id).await?;
    Ok(web::Json(comment.into()))
}

async fn update_comment(
    state: &HttpState,
    caller: &UserId,
    path: (i64, i64, String),
    payload: CommentRequest,
    mode: UpdateMode,
) -> ApiResult<web::Json<CommentResponse>> {
    let (project, issue, id) = comment_path(path)?;
    let changes = Submission::from(
        payload
            .description(mode)
            .map(|description| CommentChanges { description }),
    );
    let comment = state
        .comments
        .update(caller, project, issue, id, changes)
        .await?;
    Ok(web::Json(comment.into()))
}

/// Rewrite a comment. Reserved to the comment author.
#[utoipa::path(
    put,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}/comments/{comment_id}",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a contributor or not the author", body = ErrorSchema),
        (status = 404, description = "Not found under this issue", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "replaceComment"
)]
#[put("/projects/{project_id}/issues/{issue_id}/comments/{comment_id}")]
pub async fn replace_comment(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64, String)>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<CommentResponse>> {
    update_comment(
        &state,
        &caller,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Replace,
    )
    .await
}

#[utoipa::path(
    patch,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}/comments/{comment_id}",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Updated comment", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not a contributor or not the author", body = ErrorSchema),
        (status = 404, description = "Not found under this issue", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "patchComment"
)]
#[patch("/projects/{project_id}/issues/{issue_id}/comments/{comment_id}")]
pub async fn patch_comment(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64, String)>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<CommentResponse>> {
    update_comment(
        &state,
        &caller,
        path.into_inner(),
        payload.into_inner(),
        UpdateMode::Merge,
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/projects/{project_id}/issues/{issue_id}/comments/{comment_id}",
    params(
        ("project_id" = i64, Path, description = "Project identifier"),
        ("issue_id" = i64, Path, description = "Issue identifier"),
        ("comment_id" = String, Path, description = "Comment identifier")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Malformed comment id", body = ErrorSchema),
        (status = 403, description = "Not a contributor or not the author", body = ErrorSchema),
        (status = 404, description = "Not found under this issue", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/projects/{project_id}/issues/{issue_id}/comments/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<(i64, i64, String)>,
) -> ApiResult<HttpResponse> {
    let (project, issue, id) = comment_path(path.into_inner())?;
    state.comments.delete(&caller, project, issue, id).await?;
    Ok(HttpResponse::NoContent().finish())
}
