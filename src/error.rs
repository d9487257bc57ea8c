use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Catalog loading failures. All of these are fatal at startup; the process
/// must not serve traffic with an invalid catalog.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("config file {path} could not be read")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("config schema violation: {0}")]
    SchemaViolation(String),
}

/// Submission failures. Recoverable: surfaced to the submitter as a rejected
/// request, never retried, never fatal.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("wrong password")]
    WrongPassword,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown class code: {0}")]
    UnknownClass(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Invalid(ValidationError::WrongPassword) => StatusCode::UNAUTHORIZED,
            AppError::Invalid(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
