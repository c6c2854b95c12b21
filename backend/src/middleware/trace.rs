//! Request correlation and access logging.
//!
//! [`Trace`] mints a [`TraceId`] per request and runs the rest of the stack
//! inside [`TraceId::scope`], so domain errors and log lines emitted while
//! handling the request carry it. The id is echoed in the `trace-id`
//! response header and one `request completed` event is logged per request.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, error, info, info_span, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory; wrap it outermost so every response is tagged.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use kudotrio::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

pub struct TraceMiddleware<S> {
    service: S,
}

fn tag_response<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.response_mut()
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => error!(%error, "trace id is not a valid header value"),
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        let started = Instant::now();
        let inner = TraceId::scope(trace_id, self.service.call(req));
        Box::pin(
            async move {
                let result = inner.await;
                let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                match result {
                    Ok(mut res) => {
                        tag_response(&mut res, trace_id);
                        info!(status = res.status().as_u16(), elapsed_ms, "request completed");
                        Ok(res)
                    }
                    Err(error) => {
                        warn!(%error, elapsed_ms, "request failed before a response was built");
                        Err(error)
                    }
                }
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error as DomainError;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    async fn echo_trace_id() -> HttpResponse {
        match TraceId::current() {
            Some(id) => HttpResponse::Ok().body(id.to_string()),
            None => HttpResponse::InternalServerError().finish(),
        }
    }

    async fn missing_kudo() -> Result<HttpResponse, DomainError> {
        Err(DomainError::not_found("kudo missing"))
    }

    fn header(res: &ServiceResponse) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .expect("trace id header")
    }

    #[rstest]
    #[actix_web::test]
    async fn handlers_see_the_header_value() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_trace_id)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let trace_id = header(&res);
        assert_eq!(test::read_body(res).await, trace_id);
    }

    #[rstest]
    #[actix_web::test]
    async fn error_payloads_carry_the_header_value() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(missing_kudo)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let trace_id = header(&res);
        let body: DomainError = test::read_body_json(res).await;
        assert_eq!(body.trace_id(), Some(trace_id.as_str()));
    }

    #[rstest]
    #[actix_web::test]
    async fn unrouted_requests_are_tagged_too() {
        let app = test::init_service(App::new().wrap(Trace)).await;

        let first =
            test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
        let second =
            test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;

        assert_eq!(first.status(), StatusCode::NOT_FOUND);
        assert_ne!(header(&first), header(&second));
    }
}
