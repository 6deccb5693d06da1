use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::profiles::ValidationError;
use crate::error::{codes, ErrorResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation failed: {}", .fields.join(", "))]
    Validation { fields: Vec<String> },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("profile store error: {0}")]
    Store(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("another change is still being submitted")]
    Busy,

    #[error("invalid edit state: {0}")]
    InvalidState(&'static str),
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        Self::Validation { fields: err.fields }
    }
}

impl ClientError {
    /// Map a non-2xx server answer back onto the error taxonomy.
    pub(crate) fn from_response(status: StatusCode, body: Option<ErrorResponse>) -> Self {
        let message = body
            .as_ref()
            .map(|b| b.message.clone())
            .unwrap_or_else(|| format!("server answered {}", status));

        match status {
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::BAD_REQUEST => match body {
                Some(ErrorResponse {
                    code,
                    fields: Some(fields),
                    ..
                }) if code == codes::VALIDATION_ERROR => Self::Validation { fields },
                _ => Self::Rejected(message),
            },
            _ => Self::Store(message),
        }
    }
}
