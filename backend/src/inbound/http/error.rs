//! HTTP error payloads and mapping from domain failures.
//!
//! Data-quality outcomes never reach this module: dangling references are
//! encoded in successful payloads by the populator. What arrives here is
//! caller mistakes (bad pagination, unknown sort fields, malformed keys)
//! and infrastructure faults (the store being unreachable), which map to
//! the error form of the response envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use pagination::PageRequestError;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::FieldSpecError;
use crate::domain::ports::{CatalogStoreError, ReferenceStoreError};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// An unexpected error occurred behind the API.
    InternalError,
}

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Always `false` in the error envelope.
    pub success: bool,
    /// Human-readable description of the failure.
    #[schema(example = "limit must be between 1 and 100")]
    pub message: String,
    /// Stable failure category.
    #[schema(example = "invalid_request")]
    pub error: ErrorCode,
}

impl ApiError {
    /// Error with an explicit code and message.
    pub fn new(error: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
        }
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    fn to_status_code(&self) -> StatusCode {
        match self.error {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.to_status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self.error, ErrorCode::InternalError) {
            // Infrastructure detail stays in the logs, not the response.
            let mut redacted = self.clone();
            redacted.message = "Internal server error".to_owned();
            return builder.json(redacted);
        }
        builder.json(self)
    }
}

impl From<ReferenceStoreError> for ApiError {
    fn from(err: ReferenceStoreError) -> Self {
        error!(error = %err, "reference store failure");
        Self::internal(err.to_string())
    }
}

impl From<CatalogStoreError> for ApiError {
    fn from(err: CatalogStoreError) -> Self {
        error!(error = %err, "catalog store failure");
        Self::internal(err.to_string())
    }
}

impl From<PageRequestError> for ApiError {
    fn from(err: PageRequestError) -> Self {
        Self::invalid_request(err.to_string())
    }
}

impl From<FieldSpecError> for ApiError {
    fn from(err: FieldSpecError) -> Self {
        // A bad field spec is a handler defect, not caller input.
        error!(error = %err, "malformed field spec");
        Self::internal(err.to_string())
    }
}

/// Convenience alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;
