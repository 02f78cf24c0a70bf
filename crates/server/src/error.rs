//! HTTP mapping for pingsweep errors

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use pingsweep_common::PingsweepError;
use tracing::{debug, error};

/// Wraps [`PingsweepError`] so handlers can return it with `?`.
#[derive(Debug)]
pub struct ApiError(pub PingsweepError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PingsweepError::InvalidSubnet(_)
            | PingsweepError::TooManyHosts { .. }
            | PingsweepError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            PingsweepError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            PingsweepError::ProbeFailure(_)
            | PingsweepError::Template(_)
            | PingsweepError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PingsweepError> for ApiError {
    fn from(err: PingsweepError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            debug!("Rejected request: {}", self.0);
        } else {
            error!("{}", self.0);
        }

        let body = self.0.to_string();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            return (status, [(header::ALLOW, "POST")], body).into_response();
        }
        (status, body).into_response()
    }
}
