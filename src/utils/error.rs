use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::BadRequest(ref msg) => {
                tracing::debug!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures of the external rewrite step. Never shown to clients: every
/// variant ends in the rule-based fallback.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("Invalid rewrite endpoint: {endpoint}")]
    InvalidEndpoint { endpoint: String },

    #[error("Rewrite request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rewrite service returned status {status}")]
    Status { status: u16 },

    #[error("Rewrite timed out after {millis}ms")]
    Timeout { millis: u128 },

    #[error("Rewrite service returned no text")]
    EmptyOutput,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
