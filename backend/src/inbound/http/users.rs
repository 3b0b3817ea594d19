//! Users API handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"ada","password":"correct horse"}
//! POST /api/v1/logout
//! POST /api/v1/users
//! GET /api/v1/users
//! GET|PUT|PATCH|DELETE /api/v1/users/{user_id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    Error, LoginCredentials, LoginValidationError, NewUser, Password, PersonName, User,
    Submission, UserChanges, UserId, Username, validation_error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::{SessionContext, SignedIn};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, UpdateMode, parse_date, parse_uuid, reject_read_only, require,
};

const USER_ID: FieldName = FieldName::new("userId");
const USERNAME: FieldName = FieldName::new("username");
const PASSWORD: FieldName = FieldName::new("password");
const FIRST_NAME: FieldName = FieldName::new("firstName");
const LAST_NAME: FieldName = FieldName::new("lastName");
const DATE_BIRTH: FieldName = FieldName::new("dateBirth");
const CAN_BE_CONTACTED: FieldName = FieldName::new("canBeContacted");
const CAN_DATA_BE_SHARED: FieldName = FieldName::new("canDataBeShared");

/// Login request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"username":"ada","password":"correct horse"}`
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Account as rendered to clients. The password hash never leaves the
/// domain.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(format = Uuid, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_birth: NaiveDate,
    pub can_be_contacted: bool,
    pub can_data_be_shared: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.to_string(),
            first_name: user.first_name.as_ref().to_owned(),
            last_name: user.last_name.as_ref().to_owned(),
            date_birth: user.date_birth,
            can_be_contacted: user.can_be_contacted,
            can_data_be_shared: user.can_data_be_shared,
        }
    }
}

/// Registration and profile update payload.
///
/// Registration needs `username`, `password` and `dateBirth`. A full update
/// (`PUT`) needs every profile field; `password` stays optional so clients
/// can replace a profile without resetting credentials.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: Option<String>,
    #[schema(write_only, min_length = 8)]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(format = Date, example = "1990-05-17")]
    pub date_birth: Option<String>,
    pub can_be_contacted: Option<bool>,
    pub can_data_be_shared: Option<bool>,
    #[schema(value_type = Option<Object>, read_only)]
    pub id: Option<Value>,
}

fn username(raw: String) -> Result<Username, Error> {
    Username::new(raw).map_err(|err| validation_error(&err))
}

fn password(raw: String) -> Result<Password, Error> {
    Password::new(raw).map_err(|err| validation_error(&err))
}

fn person_name(field: &'static str, raw: String) -> Result<PersonName, Error> {
    PersonName::new(field, raw).map_err(|err| validation_error(&err))
}

fn date_birth(raw: String) -> Result<NaiveDate, Error> {
    parse_date(&raw, DATE_BIRTH)
}

impl UserRequest {
    fn into_new_user(self) -> Result<NewUser, Error> {
        reject_read_only(&[(FieldName::new("id"), &self.id)])?;
        Ok(NewUser {
            username: username(require(self.username, USERNAME)?)?,
            password: password(require(self.password, PASSWORD)?)?,
            first_name: person_name("firstName", self.first_name.unwrap_or_default())?,
            last_name: person_name("lastName", self.last_name.unwrap_or_default())?,
            date_birth: date_birth(require(self.date_birth, DATE_BIRTH)?)?,
            can_be_contacted: self.can_be_contacted.unwrap_or(false),
            can_data_be_shared: self.can_data_be_shared.unwrap_or(false),
        })
    }

    fn into_changes(self, mode: UpdateMode) -> Result<UserChanges, Error> {
        reject_read_only(&[(FieldName::new("id"), &self.id)])?;
        Ok(UserChanges {
            username: mode.field(self.username, USERNAME)?.map(username).transpose()?,
            first_name: mode
                .field(self.first_name, FIRST_NAME)?
                .map(|raw| person_name("firstName", raw))
                .transpose()?,
            last_name: mode
                .field(self.last_name, LAST_NAME)?
                .map(|raw| person_name("lastName", raw))
                .transpose()?,
            date_birth: mode
                .field(self.date_birth, DATE_BIRTH)?
                .map(date_birth)
                .transpose()?,
            can_be_contacted: mode.field(self.can_be_contacted, CAN_BE_CONTACTED)?,
            can_data_be_shared: mode.field(self.can_data_be_shared, CAN_DATA_BE_SHARED)?,
            password: self.password.map(password).transpose()?,
        })
    }
}

fn user_path(raw: &str) -> Result<UserId, Error> {
    parse_uuid(raw, USER_ID).map(UserId::from_uuid)
}

/// Authenticate user and establish a session.
///
/// Uses the centralised `Error` type so clients get a consistent
/// error schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| validation_error(&err))?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.forget();
    HttpResponse::NoContent().finish()
}

/// Register a new account. Open to anonymous callers.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let user = payload.into_inner().into_new_user()?;
    let created = state.users.register(user).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

/// List every account, ordered by username.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: SignedIn,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list(&caller).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = user_path(&path)?;
    let user = state.users.get(&caller, &id).await?;
    Ok(web::Json(user.into()))
}

async fn update_user(
    state: &HttpState,
    caller: &UserId,
    raw_id: &str,
    payload: UserRequest,
    mode: UpdateMode,
) -> ApiResult<web::Json<UserResponse>> {
    let id = user_path(raw_id)?;
    let changes = Submission::from(payload.into_changes(mode));
    let user = state.users.update(caller, &id, changes).await?;
    Ok(web::Json(user.into()))
}

/// Replace a profile. Only the account owner may do so.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the account owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "replaceUser"
)]
#[put("/users/{user_id}")]
pub async fn replace_user(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    update_user(&state, &caller, &path, payload.into_inner(), UpdateMode::Replace).await
}

/// Change some profile fields. Only the account owner may do so.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the account owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "patchUser"
)]
#[patch("/users/{user_id}")]
pub async fn patch_user(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<String>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    update_user(&state, &caller, &path, payload.into_inner(), UpdateMode::Merge).await
}

/// Delete an account together with everything it authored.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the account owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: SignedIn,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_path(&path)?;
    state.users.delete(&caller, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
