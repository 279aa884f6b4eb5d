use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// API-level error: a status code plus the error kind echoed in the body
/// as `{"error": "<Kind>"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
}

impl ApiError {
    pub fn invalid_parent() -> Self {
        Self { status: StatusCode::BAD_REQUEST, kind: "InvalidParent" }
    }

    pub fn duplicate_email() -> Self {
        Self { status: StatusCode::FORBIDDEN, kind: "DuplicateEmail" }
    }

    pub fn parent_not_found() -> Self {
        Self { status: StatusCode::NOT_FOUND, kind: "ParentNotFound" }
    }

    fn internal() -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, kind: "InternalServerError" }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidParent(_) => Self::invalid_parent(),
            ServiceError::DuplicateEmail(_) => Self::duplicate_email(),
            ServiceError::ParentNotFound(_) => Self::parent_not_found(),
            ServiceError::Storage(msg) => {
                error!(error = %msg, "storage failure while handling request");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.kind }))).into_response()
    }
}
