//! Per-request persistence session extractor.

use std::future::{Ready, ready};
use std::ops::Deref;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use quill_infra::BlogSession;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// A [`BlogSession`] opened for the current request.
///
/// Each extraction builds a new session over the shared pool, so staged
/// changes never leak between requests.
pub struct Session(BlogSession);

impl Deref for Session {
    type Target = BlogSession;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.app_data::<web::Data<AppState>>() {
            Some(state) => ready(Ok(Session(state.session()))),
            None => ready(Err(AppError::Internal(
                "Application state is not configured".to_string(),
            ))),
        }
    }
}
