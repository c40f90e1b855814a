use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use glucose_guide_domain::services::GlucoseServiceError;

use crate::entities::ErrorResponse;

/// Error returned by the record handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// No record with the requested id
    #[error("Record not found")]
    NotFound,

    /// Decoding or storage failure, reported with its raw message
    #[error("{0}")]
    Internal(String),
}

impl From<GlucoseServiceError> for ApiError {
    fn from(err: GlucoseServiceError) -> Self {
        match err {
            GlucoseServiceError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
