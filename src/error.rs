use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid email or password")]
    Authentication,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Failed to read from database: {0}")]
    RemoteRead(String),

    #[error("Failed to write to database: {0}")]
    RemoteWrite(String),

    #[error("Remote procedure failed: {0}")]
    RemoteProcedure(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::RemoteRead(_) | AppError::RemoteWrite(_) | AppError::RemoteProcedure(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        if status_code.is_server_error() {
            log::error!(
                "Request failed with status {}: {}",
                status_code,
                error_message
            );
        } else {
            log::warn!(
                "Request rejected with status {}: {}",
                status_code,
                error_message
            );
        }

        HttpResponse::build(status_code).json(ApiResponse::<()>::error(&error_message))
    }
}

impl AppError {
    pub fn remote_read(error: impl std::fmt::Display) -> Self {
        log::error!("Database read failed: {}", error);
        AppError::RemoteRead(error.to_string())
    }

    pub fn remote_write(error: impl std::fmt::Display) -> Self {
        log::error!("Database write failed: {}", error);
        AppError::RemoteWrite(error.to_string())
    }

    pub fn remote_procedure(error: impl std::fmt::Display) -> Self {
        log::error!("Remote procedure failed: {}", error);
        AppError::RemoteProcedure(error.to_string())
    }

    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    /// True for failures of the remote database, which screens confine to an
    /// inline notice instead of failing the request.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::RemoteRead(_) | AppError::RemoteWrite(_) | AppError::RemoteProcedure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_map_to_bad_gateway() {
        assert_eq!(
            AppError::RemoteRead("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::RemoteProcedure("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert!(AppError::RemoteWrite("x".into()).is_remote());
        assert!(!AppError::Validation("x".into()).is_remote());
    }

    #[test]
    fn authentication_failure_message_does_not_leak_cause() {
        let err = AppError::Authentication;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Invalid email or password");
    }
}
