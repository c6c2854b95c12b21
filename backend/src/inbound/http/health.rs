//! Liveness and readiness probes.
//!
//! The server flips readiness once its listeners are bound. Liveness holds
//! for as long as the process answers requests.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

#[derive(Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// Not ready yet, but alive.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn probe_response(ok: bool) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive")
    )
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    probe_response(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    #[rstest]
    #[case::starting(false, StatusCode::SERVICE_UNAVAILABLE)]
    #[case::serving(true, StatusCode::OK)]
    #[actix_web::test]
    async fn readiness_follows_startup_while_liveness_holds(
        #[case] bound: bool,
        #[case] readiness: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new());
        if bound {
            state.mark_ready();
        }
        let app =
            test::init_service(App::new().app_data(state).service(ready).service(live)).await;

        let ready_res =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        let live_res =
            test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request())
                .await;

        assert_eq!(ready_res.status(), readiness);
        assert_eq!(live_res.status(), StatusCode::OK);
        assert_eq!(
            ready_res
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
    }
}
