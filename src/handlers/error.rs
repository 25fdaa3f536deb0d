// src/handlers/error.rs
use std::fmt;

use serde_json::{json, Value};
use warp::http::StatusCode;
use warp::reject::Reject;

use crate::error::{ChartError, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorKind {
    Validation {
        missing: Vec<&'static str>,
        invalid: Vec<String>,
    },
    BadRequest,
    Computation,
    Internal,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Internal,
            message: message.into(),
        }
    }

    pub fn validation(err: ValidationError) -> Self {
        ApiError {
            message: err.to_string(),
            kind: ApiErrorKind::Validation {
                missing: err.missing,
                invalid: err.invalid,
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::BadRequest,
            message: message.into(),
        }
    }

    pub fn computation(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::Computation,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ApiErrorKind::Validation { .. } | ApiErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorKind::Computation | ApiErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body sent to the client. Internal details stay in the logs.
    pub fn body(&self) -> Value {
        match &self.kind {
            ApiErrorKind::Validation { missing, invalid } => json!({
                "error": self.message,
                "missing": missing,
                "invalid": invalid,
                "required_format": required_format(),
            }),
            ApiErrorKind::BadRequest => json!({
                "error": "Invalid request",
                "message": self.message,
                "required_format": required_format(),
            }),
            ApiErrorKind::Computation => json!({
                "error": "Calculation failed",
                "message": self.message,
            }),
            ApiErrorKind::Internal => json!({
                "error": "Internal server error",
                "message": "Something went wrong on the server",
            }),
        }
    }
}

/// Shape of a valid `/calculate` request.
pub fn required_format() -> Value {
    json!({
        "date": "YYYY-MM-DD",
        "time": "HH:MM",
        "latitude": "number (degrees)",
        "longitude": "number (degrees)",
        "timezone": "number (optional, hours offset from UTC)"
    })
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::Validation(v) => ApiError::validation(v),
            ChartError::Parse(message) => ApiError::bad_request(message),
            ChartError::Computation(message) => ApiError::computation(message),
            ChartError::Internal(message) => ApiError::new(message),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
