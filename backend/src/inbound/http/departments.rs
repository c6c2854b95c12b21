//! Department administration handlers. Every route is admin only.
//!
//! ```text
//! GET  /api/v1/departments
//! POST /api/v1/departments {"name":"Sales"}
//! GET  /api/v1/departments/{id}
//! PUT  /api/v1/departments/{id} {"name":"Field Sales"}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Department, DepartmentDetails, DepartmentId, DepartmentSummary, Error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::{FieldName, parse_uuid};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentBody {
    #[schema(example = "Sales")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            id: department.id.to_string(),
            name: department.name.as_str().to_owned(),
            created_at: department.audit.created_at,
            updated_at: department.audit.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummaryResponse {
    pub department: DepartmentResponse,
    pub user_count: u64,
}

impl From<DepartmentSummary> for DepartmentSummaryResponse {
    fn from(summary: DepartmentSummary) -> Self {
        Self {
            department: summary.department.into(),
            user_count: summary.user_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDetailsResponse {
    pub department: DepartmentResponse,
    pub user_count: u64,
    pub members: Vec<UserResponse>,
}

impl From<DepartmentDetails> for DepartmentDetailsResponse {
    fn from(details: DepartmentDetails) -> Self {
        Self {
            department: details.department.into(),
            user_count: details.user_count,
            members: details.members.into_iter().map(UserResponse::from).collect(),
        }
    }
}

fn department_id(raw: &str) -> Result<DepartmentId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(DepartmentId::from_uuid)
}

/// Departments with member counts, ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    responses(
        (status = 200, description = "Departments", body = [DepartmentSummaryResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["departments"],
    operation_id = "listDepartments"
)]
#[get("/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DepartmentSummaryResponse>>> {
    let actor = current_actor(&state, &session).await?;
    let departments = state.departments.list_departments(&actor).await?;
    Ok(web::Json(
        departments
            .into_iter()
            .map(DepartmentSummaryResponse::from)
            .collect(),
    ))
}

/// Create a department. Names are unique ignoring case.
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    request_body = DepartmentBody,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Invalid name", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Name already used", body = Error)
    ),
    tags = ["departments"],
    operation_id = "addDepartment"
)]
#[post("/departments")]
pub async fn add_department(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DepartmentBody>,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    let department = state
        .departments
        .add_department(&actor, &payload.name)
        .await?;
    Ok(HttpResponse::Created().json(DepartmentResponse::from(department)))
}

/// A department with its members.
#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}",
    params(("id" = String, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department", body = DepartmentDetailsResponse),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["departments"],
    operation_id = "departmentDetails"
)]
#[get("/departments/{id}")]
pub async fn department_details(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DepartmentDetailsResponse>> {
    let actor = current_actor(&state, &session).await?;
    let id = department_id(&path)?;
    let details = state.departments.department_details(&actor, &id).await?;
    Ok(web::Json(DepartmentDetailsResponse::from(details)))
}

/// Rename a department.
#[utoipa::path(
    put,
    path = "/api/v1/departments/{id}",
    params(("id" = String, Path, description = "Department id")),
    request_body = DepartmentBody,
    responses(
        (status = 200, description = "Department renamed", body = DepartmentResponse),
        (status = 400, description = "Invalid name", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Name already used", body = Error)
    ),
    tags = ["departments"],
    operation_id = "editDepartment"
)]
#[put("/departments/{id}")]
pub async fn edit_department(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<DepartmentBody>,
) -> ApiResult<web::Json<DepartmentResponse>> {
    let actor = current_actor(&state, &session).await?;
    let id = department_id(&path)?;
    let department = state
        .departments
        .edit_department(&actor, &id, &payload.name)
        .await?;
    Ok(web::Json(DepartmentResponse::from(department)))
}

#[cfg(test)]
#[path = "departments_tests.rs"]
mod tests;
