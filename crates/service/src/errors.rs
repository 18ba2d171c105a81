use thiserror::Error;

use models::errors::ModelError;
use models::property::FieldViolation;

use crate::auth::errors::AuthError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {}", describe(.0))]
    Validation(Vec<FieldViolation>),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("authentication required: {0}")]
    AuthRequired(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations.iter().map(|v| format!("{}: {}", v.field, v.message)).collect::<Vec<_>>().join("; ")
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(message) => {
                ServiceError::Validation(vec![FieldViolation { field: "property".into(), message }])
            }
            ModelError::Db(msg) => ServiceError::Persistence(msg),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Repository(msg) => ServiceError::Persistence(msg),
            other => ServiceError::AuthRequired(other.to_string()),
        }
    }
}
