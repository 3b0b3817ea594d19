//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their wire shape so the generated document matches
//! what the handlers actually emit.

use utoipa::ToSchema;

use crate::domain::Choice;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The database could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Validation failures carry `details` of the form `{"field", "code"}`;
/// authorisation failures carry `{"code"}`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title must not be blank")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "6f1d7a2e-5b1c-4f0e-9d53-2a1c0f3b7e44")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    #[schema(example = json!({"field": "title", "code": "blank"}))]
    details: Option<serde_json::Value>,
}

/// One selectable enumeration member.
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct ChoiceSchema {
    #[schema(example = "in_progress")]
    pub value: String,
    #[schema(example = "In Progress")]
    pub label: String,
}

impl From<Choice> for ChoiceSchema {
    fn from(choice: Choice) -> Self {
        Self {
            value: choice.value.to_owned(),
            label: choice.label.to_owned(),
        }
    }
}
