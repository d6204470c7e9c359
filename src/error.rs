//! HTTP-facing error taxonomy.
//!
//! Every failure leaves the service as `{"status": "error", "error": ...}`
//! with an optional `details` field carrying provider output.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::sms::SmsError;
use crate::translation::TranslationError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed caller input
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UnsupportedLanguage(String),

    /// The SMS provider declined the message
    #[error("Twilio error: {0}")]
    ProviderRejection(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Timeout(String),

    /// A required credential is absent
    #[error("{0}")]
    Configuration(String),

    /// A provider answered with an error status, passed through as-is
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
        details: String,
    },

    #[error("{0}")]
    Internal(String),

    #[error("Endpoint not found")]
    NotFound,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::UnsupportedLanguage(_)
            | ApiError::ProviderRejection(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::Upstream { status, .. } => *status,
            ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let details = match self {
            ApiError::Upstream { details, .. } => Some(details.clone()),
            _ => None,
        };
        ErrorBody {
            status: "error",
            error: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

impl From<TranslationError> for ApiError {
    fn from(err: TranslationError) -> Self {
        match err {
            TranslationError::UnsupportedLanguage { .. } => {
                ApiError::UnsupportedLanguage(err.to_string())
            }
            TranslationError::MissingApiKey => ApiError::Configuration(err.to_string()),
            TranslationError::Timeout => ApiError::Timeout(err.to_string()),
            TranslationError::Connection => ApiError::ServiceUnavailable(err.to_string()),
            TranslationError::Provider { status, details } => ApiError::Upstream {
                status,
                message: "Translation service unavailable".to_string(),
                details,
            },
            TranslationError::Other(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SmsError> for ApiError {
    fn from(err: SmsError) -> Self {
        match err {
            SmsError::MissingRecipient => ApiError::Validation(err.to_string()),
            SmsError::MissingCredentials => ApiError::Configuration(err.to_string()),
            SmsError::Rejected { message, .. } => ApiError::ProviderRejection(message),
            SmsError::Transport(_) => {
                ApiError::Internal(format!("Internal server error: {}", err))
            }
        }
    }
}
