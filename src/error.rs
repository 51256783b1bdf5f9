use accounts::AccountsError;
use axum::{
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Accounts(#[from] AccountsError),

    #[error("Authentication credentials were not provided")]
    Unauthorized,

    #[error("You do not have permission to perform this action")]
    Forbidden,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Accounts(AccountsError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::Accounts(AccountsError::NotFound(_)) => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
            ApiError::Accounts(AccountsError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
            }
            ApiError::Accounts(AccountsError::Database(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
            ApiError::Accounts(AccountsError::PasswordHash(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "AUTHENTICATION_REQUIRED"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let (message, fields) = match self {
            ApiError::Accounts(AccountsError::Validation(errors)) => {
                warn!("Rejected submission: {}", errors);
                ("Invalid submission".to_string(), Some(errors.into_inner()))
            }
            other if status.is_server_error() => {
                error!("Request failed: {}", other);
                ("Internal server error".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
            fields,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"devoluciones\""),
            );
        }
        response
    }
}
