use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ErrorDetail, ErrorResponse};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No valid PDF files in request")]
    NoValidUploads,

    #[error("Malformed multipart body: {message}")]
    Multipart { message: String },

    #[error("Failed to stage uploads: {message}")]
    Staging { message: String },

    #[error("PDF optimization failed for every file in the request")]
    OptimizationFailed,

    #[error("Archiving failed: {message}")]
    ArchivingFailed { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NoValidUploads => "NO_VALID_UPLOADS",
            AppError::Multipart { .. } => "MULTIPART_ERROR",
            AppError::Staging { .. } => "STAGING_ERROR",
            AppError::OptimizationFailed => "OPTIMIZATION_FAILED",
            AppError::ArchivingFailed { .. } => "ARCHIVING_FAILED",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoValidUploads => StatusCode::NOT_FOUND,
            AppError::Multipart { .. } => StatusCode::BAD_REQUEST,
            AppError::Staging { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::OptimizationFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ArchivingFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();
        let request_id = Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().to_rfc3339();

        tracing::error!(
            error_code = error_code,
            status_code = %status,
            request_id = %request_id,
            error_message = %message,
            "API error occurred"
        );

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                request_id,
                timestamp,
            },
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

// Helper methods for creating specific errors
impl AppError {
    pub fn staging(message: impl Into<String>) -> Self {
        AppError::Staging {
            message: message.into(),
        }
    }

    pub fn archiving(message: impl Into<String>) -> Self {
        AppError::ArchivingFailed {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}
