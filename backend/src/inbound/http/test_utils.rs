//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::ServiceResponse;
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockDepartmentAdministration, MockKudosCommand, MockKudosDashboardQuery, MockUserAccounts,
    MockUserImportCommand,
};
use crate::domain::{
    Actor, EmailAddress, Error, PersonName, UserId, UserProfile, UserRole, UserStatus,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, api_routes};
use crate::middleware::Trace;

const SIGN_IN_PATH: &str = "/test/session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// An active profile with the given role.
pub fn profile(role: UserRole) -> UserProfile {
    UserProfile {
        id: UserId::random(),
        department_id: None,
        email: EmailAddress::new("ada@example.com").expect("fixture email"),
        first_name: PersonName::new("Ada", "first_name").expect("fixture name"),
        last_name: PersonName::new("Lovelace", "last_name").expect("fixture name"),
        role,
        status: UserStatus::Active,
    }
}

/// Mocked driving ports; set expectations, then call [`TestPorts::into_state`].
#[derive(Default)]
pub struct TestPorts {
    pub accounts: MockUserAccounts,
    pub dashboard: MockKudosDashboardQuery,
    pub kudos: MockKudosCommand,
    pub departments: MockDepartmentAdministration,
    pub imports: MockUserImportCommand,
}

impl TestPorts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every session to `profile`.
    pub fn signed_in(mut self, profile: &UserProfile) -> Self {
        let actor = Actor::from(profile);
        self.accounts
            .expect_actor_for()
            .returning(move |_| Ok(actor.clone()));
        self
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            accounts: Arc::new(self.accounts),
            dashboard: Arc::new(self.dashboard),
            kudos: Arc::new(self.kudos),
            departments: Arc::new(self.departments),
            imports: Arc::new(self.imports),
        }
    }
}

async fn sign_in(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let id = UserId::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.sign_in(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Send `request` through the full `/api/v1` stack.
///
/// With `user` set, a session cookie for that id is obtained first.
pub async fn send(
    state: HttpState,
    user: Option<UserId>,
    request: test::TestRequest,
) -> ServiceResponse {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .wrap(Trace)
            .route(
                &format!("{SIGN_IN_PATH}/{{id}}"),
                web::post().to(sign_in),
            )
            .service(web::scope("/api/v1").configure(api_routes)),
    )
    .await;

    let request = match user {
        Some(id) => {
            let res = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&format!("{SIGN_IN_PATH}/{id}"))
                    .to_request(),
            )
            .await;
            let cookie = res
                .response()
                .cookies()
                .find(|cookie| cookie.name() == "session")
                .expect("session cookie set")
                .into_owned();
            request.cookie(cookie)
        }
        None => request,
    };
    test::call_service(&app, request.to_request()).await
}

/// Deserialize an error payload and return its `details.code`, if any.
pub async fn error_detail_code(res: ServiceResponse) -> (Error, Option<String>) {
    let error: Error = test::read_body_json(res).await;
    let code = error
        .details()
        .and_then(|details| details.get("code"))
        .and_then(|code| code.as_str())
        .map(str::to_owned);
    (error, code)
}
