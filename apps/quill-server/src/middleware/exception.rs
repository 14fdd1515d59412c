//! Last-resort error handling.
//!
//! Catches failures no handler dealt with: an error returned by the inner
//! service, a panic while serving the request, or a 5xx response carrying an
//! error. API callers get a JSON envelope, browsers are redirected to the
//! error page. Handled (4xx) responses pass through untouched.

use std::any::Any;
use std::future::{Future, Ready, ready};
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    cookie::{Cookie, time::Duration},
    error::InternalError,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderMap},
};
use futures::FutureExt;

use quill_shared::ApiResponse;

use crate::config::Environment;

pub const ERROR_PAGE: &str = "/error";
pub const ERROR_DETAIL_COOKIE: &str = "error_detail";
const REQUESTED_WITH: &str = "x-requested-with";
const GENERIC_MESSAGE: &str = "An unexpected error occurred. Please try again later.";
const MAX_COOKIE_DETAIL: usize = 1000;

/// Error handling middleware factory.
pub struct ErrorHandlingMiddleware {
    environment: Environment,
}

impl ErrorHandlingMiddleware {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorHandlingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ErrorHandlingService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorHandlingService {
            service,
            development: self.environment.is_development(),
        }))
    }
}

pub struct ErrorHandlingService<S> {
    service: S,
    development: bool,
}

impl<S, B> Service<ServiceRequest> for ErrorHandlingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let is_api = is_api_request(req.headers());
        let development = self.development;
        // Routing needs sole ownership of the request, so only its identity
        // is kept across dispatch.
        let method = req.method().to_string();
        let path = req.path().to_string();
        let fut = self.service.call(req);

        Box::pin(async move {
            let failure = match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(res)) => match unhandled_error(&res) {
                    Some(message) => {
                        tracing::error!(
                            %method, %path, api = is_api, error = %message,
                            "Unhandled error while serving request"
                        );
                        let (http_req, _) = res.into_parts();
                        let response = render_failure(is_api, development, message);
                        return Ok(ServiceResponse::new(http_req, response).map_into_right_body());
                    }
                    None => return Ok(res.map_into_left_body()),
                },
                Ok(Err(err)) => err.to_string(),
                Err(panic) => format!("panic: {}", panic_message(panic.as_ref())),
            };

            tracing::error!(
                %method, %path, api = is_api, error = %failure,
                "Unhandled error while serving request"
            );

            // The request did not survive; the rendered response travels as
            // the error and is written out by the server.
            let response = render_failure(is_api, development, failure.clone());
            Err(InternalError::from_response(failure, response).into())
        })
    }
}

/// `X-Requested-With: XMLHttpRequest` marks an API call.
pub fn is_api_request(headers: &HeaderMap) -> bool {
    headers
        .get(REQUESTED_WITH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("XMLHttpRequest"))
}

fn unhandled_error<B>(res: &ServiceResponse<B>) -> Option<String> {
    if !res.status().is_server_error() {
        return None;
    }
    res.response().error().map(|e| e.to_string())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn render_failure(is_api: bool, development: bool, detail: String) -> HttpResponse {
    if is_api {
        let body = ApiResponse::failure(GENERIC_MESSAGE).with_detail(development.then_some(detail));
        return HttpResponse::InternalServerError().json(body);
    }

    let mut response = HttpResponse::Found();
    response.insert_header((header::LOCATION, ERROR_PAGE));
    if development {
        response.cookie(
            Cookie::build(ERROR_DETAIL_COOKIE, cookie_safe(&detail))
                .path("/")
                .http_only(true)
                .max_age(Duration::minutes(5))
                .finish(),
        );
    }
    response.finish()
}

/// Printable ASCII without the characters that delimit or encode cookie values.
fn cookie_safe(detail: &str) -> String {
    detail
        .chars()
        .take(MAX_COOKIE_DETAIL)
        .map(|c| match c {
            ';' | ',' | '"' | '\\' | '%' => '?',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '?',
        })
        .collect()
}
