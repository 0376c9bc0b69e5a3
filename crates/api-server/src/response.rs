//! Response envelopes and error mapping
//!
//! Every response, success or failure, is wrapped in an envelope carrying
//! the generation timestamp. Errors carry a human-readable message and
//! never an internal identifier or backtrace.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use tm_core::task::format_timestamp;
use tm_core::Error;

/// Success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(rename = "response-time")]
    pub response_time: String,
    #[serde(rename = "response-data")]
    pub response_data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(response_data: T) -> Self {
        Self {
            response_time: format_timestamp(Utc::now()),
            response_data,
        }
    }
}

/// Error envelope
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "response-time")]
    pub response_time: String,
    #[serde(rename = "response-error-message")]
    pub error_message: String,
}

impl ErrorEnvelope {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            response_time: format_timestamp(Utc::now()),
            error_message: error_message.into(),
        }
    }
}

/// Newtype carrying a core error across the router boundary
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            Error::EmptyBody
            | Error::InvalidField(_)
            | Error::InvalidId(_)
            | Error::MissingId
            | Error::InvalidUrl
            | Error::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) | Error::UnknownRoute => StatusCode::NOT_FOUND,
            Error::Storage(_) | Error::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::info!(%status, error = %self.0, "returning error response");
        (status, Json(ErrorEnvelope::new(self.0.to_string()))).into_response()
    }
}
