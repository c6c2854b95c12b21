//! OpenAPI document for the KudoTrio REST API.
//!
//! Served by Swagger UI in debug builds and printed by `kudotrio-admin
//! openapi` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::{departments, health, imports, kudos, users};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "KudoTrio API",
        description = "Peer recognition with kudos, memes, departments and user import."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        users::login,
        users::logout,
        users::register,
        users::current_user,
        users::list_users,
        users::add_user,
        kudos::dashboard,
        kudos::compose_options,
        kudos::create_kudo,
        departments::list_departments,
        departments::add_department,
        departments::department_details,
        departments::edit_department,
        imports::upload_users,
        imports::confirm_users,
        health::ready,
        health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        users::LoginRequest,
        users::RegisterBody,
        users::AddUserBody,
        users::UserResponse,
        users::UserListingResponse,
        kudos::DashboardResponse,
        kudos::MonthlyCountResponse,
        kudos::LeaderboardResponse,
        kudos::ActivityResponse,
        kudos::PartyResponse,
        kudos::ComposeResponse,
        kudos::RecipientResponse,
        kudos::TemplateResponse,
        kudos::CreateKudoBody,
        kudos::MemeBody,
        kudos::KudoResponse,
        departments::DepartmentBody,
        departments::DepartmentResponse,
        departments::DepartmentSummaryResponse,
        departments::DepartmentDetailsResponse,
        imports::UploadResponse,
        imports::ImportSummaryResponse,
    )),
    tags(
        (name = "users", description = "Accounts and sessions"),
        (name = "kudos", description = "Dashboard and kudo authoring"),
        (name = "departments", description = "Department administration"),
        (name = "imports", description = "Bulk user import"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
