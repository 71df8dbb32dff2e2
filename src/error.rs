//! Error types for the PDF Converter Server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::convert::JobError;

pub const NO_BODY_MESSAGE: &str = "No request body found.";
pub const CONVERSION_FAILED_MESSAGE: &str = "The input data could not be converted to PDF.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error was encountered";

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", NO_BODY_MESSAGE)]
    NoBody,

    #[error("{}", CONVERSION_FAILED_MESSAGE)]
    ConversionFailed,

    #[error("{}", INTERNAL_ERROR_MESSAGE)]
    Internal { context: Option<String> },
}

impl AppError {
    /// Map a failed conversion job onto the HTTP error taxonomy.
    ///
    /// The failure description reaches the client only when
    /// `expose_context` is set; it is always logged.
    pub fn from_job(err: JobError, expose_context: bool) -> Self {
        if err.is_conversion_failure() {
            tracing::warn!(error = %err, "Conversion failed");
            return AppError::ConversionFailed;
        }

        tracing::error!(error = %err, "Conversion job error");
        AppError::Internal {
            context: expose_context.then(|| err.to_string()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NoBody => StatusCode::BAD_REQUEST,
            AppError::ConversionFailed | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::NoBody => ErrorResponse {
                message: NO_BODY_MESSAGE,
                context: None,
            },
            AppError::ConversionFailed => ErrorResponse {
                message: CONVERSION_FAILED_MESSAGE,
                context: None,
            },
            AppError::Internal { context } => ErrorResponse {
                message: INTERNAL_ERROR_MESSAGE,
                context,
            },
        };

        (status, Json(body)).into_response()
    }
}
