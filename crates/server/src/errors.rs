use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::{StatusError, StatusMessage};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

pub const ACCESS_DENIED: &str = "Access Denied";
pub const MISSING_FIELDS: &str = "Key and Data required";
pub const NOT_FOUND: &str = "Data Expired or Not Found";
pub const INTERNAL: &str = "Internal Error";

/// JSON error response; storage details never reach the client.
#[derive(Debug)]
pub enum JsonApiError {
    BadRequest(String),
    Forbidden,
    NotFound,
    Internal,
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        match self {
            JsonApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(StatusMessage::denied(msg))).into_response()
            }
            JsonApiError::Forbidden => {
                (StatusCode::FORBIDDEN, Json(StatusMessage::denied(ACCESS_DENIED))).into_response()
            }
            JsonApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(StatusMessage::denied(NOT_FOUND))).into_response()
            }
            JsonApiError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(StatusError::new(INTERNAL))).into_response()
            }
        }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => JsonApiError::BadRequest(msg),
            ServiceError::NotFound(_) => JsonApiError::NotFound,
            ServiceError::Storage(_) | ServiceError::Timeout(_) => {
                error!(event = "storage_error", error = %e, "request failed on storage");
                JsonApiError::Internal
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage unavailable: {0}")]
    Storage(String),
}
