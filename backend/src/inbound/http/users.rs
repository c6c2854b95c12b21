//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/login {"email":"ada@example.com","password":"hunter22"}
//! POST /api/v1/logout
//! POST /api/v1/register
//! GET  /api/v1/users/me
//! GET  /api/v1/users
//! POST /api/v1/users
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{AddUserRequest, RegisterRequest};
use crate::domain::{
    DepartmentId, Error, LoginCredentials, LoginValidationError, UserListing, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_uuid};

const DEPARTMENT_ID: FieldName = FieldName::new("departmentId");

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Self-registration body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    #[serde(default)]
    pub department_id: Option<String>,
}

/// Administrator account creation body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddUserBody {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "user")]
    pub role: String,
    #[serde(default)]
    pub department_id: Option<String>,
}

/// Account as returned to clients. Password hashes never leave the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    #[schema(example = "user")]
    pub role: String,
    #[schema(example = "active")]
    pub status: String,
    pub department_id: Option<String>,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            display_name: profile.display_name(),
            email: profile.email.to_string(),
            first_name: profile.first_name.to_string(),
            last_name: profile.last_name.to_string(),
            role: profile.role.as_str().to_owned(),
            status: profile.status.as_str().to_owned(),
            department_id: profile.department_id.map(|id| id.to_string()),
        }
    }
}

/// Row of the administrator user list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListingResponse {
    pub user: UserResponse,
    pub department_name: Option<String>,
}

impl From<UserListing> for UserListingResponse {
    fn from(listing: UserListing) -> Self {
        Self {
            user: UserResponse::from(listing.profile),
            department_name: listing.department_name,
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

fn department_id(raw: Option<&str>) -> Result<Option<DepartmentId>, Error> {
    Ok(parse_optional_uuid(raw, DEPARTMENT_ID)?.map(DepartmentId::from_uuid))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
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
) -> ApiResult<web::Json<UserResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let profile = state.accounts.login(&credentials).await?;
    session.sign_in(&profile.id)?;
    Ok(web::Json(UserResponse::from(profile)))
}

/// End the current session.
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
    session.sign_out();
    HttpResponse::NoContent().finish()
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = RegisterRequest {
        department_id: department_id(body.department_id.as_deref())?,
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        password: body.password,
    };
    let profile = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(profile)))
}

/// Profile of the logged-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = current_actor(&state, &session).await?;
    let profile = state.accounts.profile(&actor.user_id).await?;
    Ok(web::Json(UserResponse::from(profile)))
}

/// List every user with their department name.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserListingResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserListingResponse>>> {
    let actor = current_actor(&state, &session).await?;
    let users = state.accounts.list_users(&actor).await?;
    Ok(web::Json(
        users.into_iter().map(UserListingResponse::from).collect(),
    ))
}

/// Create an account with a mailed temporary password.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = AddUserBody,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "addUser"
)]
#[post("/users")]
pub async fn add_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AddUserBody>,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    let body = payload.into_inner();
    let request = AddUserRequest {
        department_id: department_id(body.department_id.as_deref())?,
        email: body.email,
        first_name: body.first_name,
        last_name: body.last_name,
        role: body.role,
    };
    let profile = state.accounts.add_user(&actor, request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(profile)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
