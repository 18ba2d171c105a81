use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use models::property::FieldViolation;
use service::auth::errors::AuthError;
use service::errors::ServiceError;

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    pub status: u16,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    violations: Vec<FieldViolation>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), violations: Vec::new() }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    // 服务端错误只记录细节，不回显给客户端
    fn internal(detail: &str) -> Self {
        error!(error = %detail, "persistence failure");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(violations) => {
                let message = err_message(&violations);
                Self { status: StatusCode::BAD_REQUEST, message, violations }
            }
            ServiceError::AuthRequired(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(msg) => {
                info!(%msg, "not found");
                Self::new(StatusCode::NOT_FOUND, msg)
            }
            ServiceError::Forbidden(msg) => {
                warn!(%msg, "forbidden");
                Self::new(StatusCode::FORBIDDEN, msg)
            }
            ServiceError::Persistence(msg) => Self::internal(&msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let code = err.code();
        let text = err.to_string();
        match err {
            AuthError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, text),
            AuthError::NotFound => Self::new(StatusCode::NOT_FOUND, text),
            AuthError::Unauthorized => {
                warn!(code, "credential check failed");
                Self::new(StatusCode::UNAUTHORIZED, text)
            }
            AuthError::Repository(msg) => Self::internal(&msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

fn err_message(violations: &[FieldViolation]) -> String {
    violations.iter().map(|v| v.message.as_str()).collect::<Vec<_>>().join("; ")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = JsonApiError {
            status: self.status.as_u16(),
            error: self.status.canonical_reason().unwrap_or("Error"),
            message: self.message,
            violations: self.violations,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (ServiceError::AuthRequired("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::Persistence("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn auth_errors_map_to_status_codes() {
        assert_eq!(ApiError::from(AuthError::Conflict).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(AuthError::Unauthorized).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(AuthError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(AuthError::Validation("x".into())).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn persistence_detail_is_not_echoed() {
        let err = ApiError::from(ServiceError::Persistence("FATAL: password authentication failed".into()));
        assert_eq!(err.message, "internal server error");
    }

    #[test]
    fn validation_keeps_each_violation() {
        let err = ApiError::from(ServiceError::Validation(vec![
            FieldViolation { field: "address".into(), message: "Address is required".into() },
            FieldViolation { field: "size".into(), message: "Size must be greater than 0".into() },
        ]));
        assert_eq!(err.message, "Address is required; Size must be greater than 0");
        assert_eq!(err.violations.len(), 2);
    }
}
