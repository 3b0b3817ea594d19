//! OpenAPI document for the tracker API.
//!
//! Handlers carry their own `utoipa::path` annotations; this module gathers
//! them, registers the schema wrappers for domain types and declares the
//! session cookie security scheme. The document backs Swagger UI in debug
//! builds and `cargo run --bin openapi-dump`.

use crate::inbound::http::choices::{self, IssueChoices, ProjectChoices};
use crate::inbound::http::comments::{self, CommentRequest, CommentResponse};
use crate::inbound::http::contributors::{
    self, AddContributorRequest, ContributorResponse,
};
use crate::inbound::http::health;
use crate::inbound::http::issues::{self, IssueRequest, IssueResponse};
use crate::inbound::http::projects::{self, ProjectRequest, ProjectResponse};
use crate::inbound::http::schemas::{ChoiceSchema, ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{self, LoginRequest, UserRequest, UserResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the cookie set by actix-session.
pub const SESSION_COOKIE: &str = "session";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Private session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Issue tracker API",
        description = "Projects, contributors, issues and comments behind session authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        users::login,
        users::logout,
        users::register_user,
        users::list_users,
        users::get_user,
        users::replace_user,
        users::patch_user,
        users::delete_user,
        projects::list_projects,
        projects::create_project,
        projects::get_project,
        projects::replace_project,
        projects::patch_project,
        projects::delete_project,
        contributors::list_contributors,
        contributors::add_contributor,
        contributors::remove_contributor,
        issues::list_issues,
        issues::create_issue,
        issues::get_issue,
        issues::replace_issue,
        issues::patch_issue,
        issues::delete_issue,
        comments::list_comments,
        comments::create_comment,
        comments::get_comment,
        comments::replace_comment,
        comments::patch_comment,
        comments::delete_comment,
        choices::project_choices,
        choices::issue_choices,
        health::ready,
        health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ChoiceSchema,
        LoginRequest,
        UserRequest,
        UserResponse,
        ProjectRequest,
        ProjectResponse,
        AddContributorRequest,
        ContributorResponse,
        IssueRequest,
        IssueResponse,
        CommentRequest,
        CommentResponse,
        ProjectChoices,
        IssueChoices,
    )),
    tags(
        (name = "users", description = "Registration, login and the user directory"),
        (name = "projects", description = "Projects visible to their contributors"),
        (name = "contributors", description = "Project membership"),
        (name = "issues", description = "Issues filed against a project"),
        (name = "comments", description = "Discussion under an issue"),
        (name = "choices", description = "Enumerations for client selectors"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
