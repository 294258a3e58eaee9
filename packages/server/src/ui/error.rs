//! Mapping from request-layer failures to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::{AccessError, ValueObjectError},
    hub::HubError,
    infrastructure::dto::http::ErrorResponseDto,
    usecase::UseCaseError,
};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed identity, room or message body
    #[error("{0}")]
    BadRequest(String),

    #[error("access denied")]
    Forbidden,

    #[error("chat hub is shutting down")]
    Unavailable,

    /// Details are logged, not returned to the caller
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::Access(AccessError::Denied { room, participant }) => {
                tracing::warn!(%room, %participant, "access denied");
                ApiError::Forbidden
            }
            UseCaseError::Access(AccessError::Unavailable(reason)) => {
                tracing::error!(%reason, "access check failed");
                ApiError::Internal("Failed to verify access")
            }
            UseCaseError::Hub(HubError::ShuttingDown) => ApiError::Unavailable,
            UseCaseError::Hub(HubError::Validation(e)) => e.into(),
            UseCaseError::Hub(HubError::Persistence(e)) => {
                tracing::error!(error = %e, "persistence failure");
                ApiError::Internal("Failed to persist or load messages")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponseDto {
            error: self.to_string(),
            code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
