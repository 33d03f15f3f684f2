use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::core::StoreError;
use crate::model::{InvalidBirthday, MissingField, Violation};
use crate::query::QueryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("persistence failure")]
    PersistenceFailure(#[source] StoreError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ServiceError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<Violation> for ServiceError {
    fn from(violation: Violation) -> Self {
        Self::InvalidInput(violation.to_string())
    }
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<MissingField> for ServiceError {
    fn from(err: MissingField) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<InvalidBirthday> for ServiceError {
    fn from(err: InvalidBirthday) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RecordNotFound(id) => Self::NotFound(format!("player {id} not found")),
            other => Self::PersistenceFailure(other),
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::PersistenceFailure(_) => return StatusCode::NOT_MODIFIED.into_response(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
