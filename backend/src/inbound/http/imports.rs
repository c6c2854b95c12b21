//! Two-phase bulk user import.
//!
//! ```text
//! POST /api/v1/imports/users?filename=people.csv   (raw CSV body)
//! POST /api/v1/imports/users/{upload_id}/confirm
//! ```
//!
//! Uploading only stages the file. Nothing is parsed or written until the
//! upload is confirmed.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, ImportSummary, UploadId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_uuid};

const FILENAME: FieldName = FieldName::new("filename");

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadParams {
    /// Original file name; must end in `.csv`.
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub upload_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummaryResponse {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

impl From<ImportSummary> for ImportSummaryResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            created: summary.created.iter().map(ToString::to_string).collect(),
            skipped: summary.skipped.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Stage a CSV file of users.
#[utoipa::path(
    post,
    path = "/api/v1/imports/users",
    params(UploadParams),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 201, description = "Upload staged", body = UploadResponse),
        (status = 400, description = "Bad file name or size", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["imports"],
    operation_id = "uploadUsers"
)]
#[post("/imports/users")]
pub async fn upload_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    let filename = params
        .into_inner()
        .filename
        .ok_or_else(|| missing_field_error(FILENAME))?;
    let upload_id = state
        .imports
        .upload(&actor, &filename, body.to_vec())
        .await?;
    Ok(HttpResponse::Created().json(UploadResponse {
        upload_id: upload_id.to_string(),
    }))
}

/// Import a staged upload as one all-or-nothing batch.
#[utoipa::path(
    post,
    path = "/api/v1/imports/users/{upload_id}/confirm",
    params(("upload_id" = String, Path, description = "Identifier returned by the upload")),
    responses(
        (status = 200, description = "Import committed", body = ImportSummaryResponse),
        (status = 400, description = "Malformed batch; nothing was written", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Unknown upload", body = Error)
    ),
    tags = ["imports"],
    operation_id = "confirmUserImport"
)]
#[post("/imports/users/{upload_id}/confirm")]
pub async fn confirm_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ImportSummaryResponse>> {
    let actor = current_actor(&state, &session).await?;
    let upload_id = UploadId::from_uuid(parse_uuid(&path, FieldName::new("uploadId"))?);
    let summary = state.imports.confirm(&actor, &upload_id).await?;
    Ok(web::Json(ImportSummaryResponse::from(summary)))
}

#[cfg(test)]
#[path = "imports_tests.rs"]
mod tests;
