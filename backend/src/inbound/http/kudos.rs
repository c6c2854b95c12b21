//! Dashboard and kudo authoring handlers.
//!
//! ```text
//! GET  /api/v1/dashboard?window_days=120&top_n=5&recent_limit=10
//! GET  /api/v1/kudos/compose
//! POST /api/v1/kudos
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    ActivityFeedEntry, CreateKudoRequest, DashboardQuery, DashboardQueryError, Error, FeedParty,
    Kudo, KudoComposeOptions, KudosDashboard, LeaderboardEntry, MemeRequest, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::current_actor;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_optional_uuid};

const RECEIVER_ID: FieldName = FieldName::new("receiverId");

/// Dashboard parameters; omitted values use the defaults.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardParams {
    /// Lookback window in days (1..=3650, default 120).
    pub window_days: Option<u32>,
    /// Leaderboard length (1..=100, default 5).
    pub top_n: Option<u32>,
    /// Recent feed length (1..=100, default 10).
    pub recent_limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCountResponse {
    #[schema(example = "2024-04")]
    pub month: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub user_id: String,
    pub display_name: String,
    pub department_name: Option<String>,
    pub kudo_count: u64,
}

impl From<LeaderboardEntry> for LeaderboardResponse {
    fn from(entry: LeaderboardEntry) -> Self {
        Self {
            user_id: entry.user_id.to_string(),
            display_name: entry.display_name,
            department_name: entry.department_name,
            kudo_count: entry.kudo_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartyResponse {
    pub user_id: String,
    pub display_name: String,
    pub department_name: Option<String>,
}

impl From<FeedParty> for PartyResponse {
    fn from(party: FeedParty) -> Self {
        Self {
            user_id: party.user_id.to_string(),
            display_name: party.display_name,
            department_name: party.department_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub kudo_id: String,
    pub created_at: DateTime<Utc>,
    pub message: String,
    pub sender: PartyResponse,
    pub receiver: PartyResponse,
    pub meme_image_url: Option<String>,
}

impl From<ActivityFeedEntry> for ActivityResponse {
    fn from(entry: ActivityFeedEntry) -> Self {
        Self {
            kudo_id: entry.kudo_id.to_string(),
            created_at: entry.created_at,
            message: entry.message,
            sender: entry.sender.into(),
            receiver: entry.receiver.into(),
            meme_image_url: entry.meme_image_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub window_days: u32,
    pub since: DateTime<Utc>,
    pub monthly_counts: Vec<MonthlyCountResponse>,
    pub top_receivers: Vec<LeaderboardResponse>,
    pub top_creators: Vec<LeaderboardResponse>,
    pub recent_activity: Vec<ActivityResponse>,
}

impl From<KudosDashboard> for DashboardResponse {
    fn from(value: KudosDashboard) -> Self {
        Self {
            window_days: value.window_days,
            since: value.since,
            monthly_counts: value
                .monthly_counts
                .into_iter()
                .map(|bucket| MonthlyCountResponse {
                    month: bucket.month,
                    count: bucket.count,
                })
                .collect(),
            top_receivers: value.top_receivers.into_iter().map(Into::into).collect(),
            top_creators: value.top_creators.into_iter().map(Into::into).collect(),
            recent_activity: value
                .recent_activity
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipientResponse {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    #[schema(example = "buzz")]
    pub id: String,
    pub name: String,
}

/// Choices offered when writing a kudo. `templates` is empty while the
/// meme service is unreachable.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComposeResponse {
    pub recipients: Vec<RecipientResponse>,
    pub templates: Vec<TemplateResponse>,
}

impl From<KudoComposeOptions> for ComposeResponse {
    fn from(options: KudoComposeOptions) -> Self {
        Self {
            recipients: options
                .recipients
                .into_iter()
                .map(|choice| RecipientResponse {
                    id: choice.id.to_string(),
                    display_name: choice.display_name,
                })
                .collect(),
            templates: options
                .templates
                .into_iter()
                .map(|template| TemplateResponse {
                    id: template.id,
                    name: template.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemeBody {
    pub template_id: String,
    #[serde(default)]
    pub top_text: String,
    #[serde(default)]
    pub bottom_text: String,
}

/// Kudo submission. A missing `receiverId` is reported as `no_selection`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateKudoBody {
    #[serde(default)]
    pub receiver_id: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub meme: Option<MemeBody>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KudoResponse {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub message: String,
    pub meme_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Kudo> for KudoResponse {
    fn from(kudo: Kudo) -> Self {
        Self {
            id: kudo.id.to_string(),
            sender_id: kudo.sender_id.to_string(),
            receiver_id: kudo.receiver_id.to_string(),
            message: kudo.message.as_str().to_owned(),
            meme_image_url: kudo.meme.map(|meme| meme.image_url),
            created_at: kudo.audit.created_at,
        }
    }
}

fn map_query_error(error: DashboardQueryError) -> Error {
    field_error(
        FieldName::new(error.field()),
        "out_of_range",
        error.to_string(),
    )
}

fn parse_create_body(body: CreateKudoBody) -> Result<CreateKudoRequest, Error> {
    let receiver_id =
        parse_optional_uuid(body.receiver_id.as_deref(), RECEIVER_ID)?.map(UserId::from_uuid);
    Ok(CreateKudoRequest {
        receiver_id,
        message: body.message,
        meme: body.meme.map(|meme| MemeRequest {
            template_id: meme.template_id,
            top_text: meme.top_text,
            bottom_text: meme.bottom_text,
        }),
    })
}

/// Monthly counts, leaderboards and the recent feed.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    params(DashboardParams),
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 400, description = "Parameter out of range", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["kudos"],
    operation_id = "dashboard"
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<DashboardParams>,
) -> ApiResult<web::Json<DashboardResponse>> {
    current_actor(&state, &session).await?;
    let DashboardParams {
        window_days,
        top_n,
        recent_limit,
    } = params.into_inner();
    let query = DashboardQuery::try_new(window_days, top_n, recent_limit).map_err(map_query_error)?;
    let view = state.dashboard.dashboard(query).await?;
    Ok(web::Json(DashboardResponse::from(view)))
}

/// Recipients and meme templates for the kudo form.
#[utoipa::path(
    get,
    path = "/api/v1/kudos/compose",
    responses(
        (status = 200, description = "Compose options", body = ComposeResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["kudos"],
    operation_id = "composeKudo"
)]
#[get("/kudos/compose")]
pub async fn compose_options(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ComposeResponse>> {
    let actor = current_actor(&state, &session).await?;
    let options = state.kudos.compose_options(&actor).await?;
    Ok(web::Json(ComposeResponse::from(options)))
}

/// Send a kudo, optionally with a captioned meme.
#[utoipa::path(
    post,
    path = "/api/v1/kudos",
    request_body = CreateKudoBody,
    responses(
        (status = 201, description = "Kudo created", body = KudoResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["kudos"],
    operation_id = "createKudo"
)]
#[post("/kudos")]
pub async fn create_kudo(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateKudoBody>,
) -> ApiResult<HttpResponse> {
    let actor = current_actor(&state, &session).await?;
    let request = parse_create_body(payload.into_inner())?;
    let kudo = state.kudos.create_kudo(&actor, request).await?;
    Ok(HttpResponse::Created().json(KudoResponse::from(kudo)))
}

#[cfg(test)]
#[path = "kudos_tests.rs"]
mod tests;
