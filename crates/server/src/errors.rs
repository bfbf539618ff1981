use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use models::errors::ModelError;
use service::errors::ServiceError;

/// JSON error body: `{ statusCode, error, message }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub error: &'static str,
    pub message: String,
}

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self { status, error, message: message.into() }
    }

    /// Malformed request: bad JSON, failed validator rules, bad path or query parameters.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", message)
    }

    /// Rule violations raised by the services themselves.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "ValidationError", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NotFoundError", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "ConflictError", message)
    }

    /// Details stay in the log; the client sees a fixed message.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(error = %detail, "internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { status_code: self.status.as_u16(), error: self.error, message: self.message };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(m) => ApiError::validation(m),
            ServiceError::NotFound(m) => ApiError::not_found(m),
            ServiceError::Conflict(m) => ApiError::conflict(m),
            ServiceError::Model(ModelError::Validation(m)) => ApiError::bad_request(m),
            other => ApiError::internal(other),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ServiceError::from(err).into()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("migrations failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST, "ValidationError"),
            (ServiceError::not_found("Vehicle"), StatusCode::NOT_FOUND, "NotFoundError"),
            (ServiceError::conflict("taken"), StatusCode::CONFLICT, "ConflictError"),
            (ServiceError::Model(ModelError::Validation("x".into())), StatusCode::BAD_REQUEST, "Bad Request"),
            (ServiceError::Db("connection reset".into()), StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        ];
        for (err, status, name) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.error, name);
        }
    }

    #[test]
    fn unknown_status_in_query_is_bad_request() {
        let err = "planning".parse::<models::OperationStatus>().unwrap_err();
        let api = ApiError::from(err);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Bad Request");
        assert!(api.message.contains("'planning'"));
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = ApiError::from(ServiceError::Db("password authentication failed".into()));
        assert_eq!(api.message, "Internal server error");
    }

    #[test]
    fn body_uses_camel_case() {
        let body = ErrorBody { status_code: 404, error: "NotFoundError", message: "Vehicle not found".into() };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["message"], "Vehicle not found");
    }
}
