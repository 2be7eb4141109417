use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication errors (1xxx)
    #[serde(rename = "AUTH_1001")]
    InvalidSignature,

    // Validation errors (3xxx)
    #[serde(rename = "VAL_3001")]
    MalformedPayload,
    #[serde(rename = "VAL_3002")]
    InvalidFieldType,
    #[serde(rename = "VAL_3005")]
    AmountOutOfRange,

    // External service errors (8xxx)
    #[serde(rename = "EXT_8001")]
    LedgerUnavailable,

    // Internal errors (9xxx)
    #[serde(rename = "INT_9999")]
    InternalServerError,
    #[serde(rename = "INT_9998")]
    ConfigurationError,
}

impl ErrorCode {
    /// Get numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::InvalidSignature => 1001,
            ErrorCode::MalformedPayload => 3001,
            ErrorCode::InvalidFieldType => 3002,
            ErrorCode::AmountOutOfRange => 3005,
            ErrorCode::LedgerUnavailable => 8001,
            ErrorCode::InternalServerError => 9999,
            ErrorCode::ConfigurationError => 9998,
        }
    }

    /// Get user-friendly message
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidSignature => "Webhook signature verification failed",
            ErrorCode::MalformedPayload => "Webhook body is not a JSON object",
            ErrorCode::InvalidFieldType => "Webhook field has an unexpected type",
            ErrorCode::AmountOutOfRange => "Amount cannot be represented in minor units",
            ErrorCode::LedgerUnavailable => "Wallet ledger is currently unavailable",
            ErrorCode::InternalServerError => "An internal server error occurred",
            ErrorCode::ConfigurationError => "Server configuration error",
        }
    }
}

/// Structured error response
///
/// The request id travels in the `X-Request-Id` header, set by the request
/// logger for every response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub code_number: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Invalid field `{field}`: expected {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    #[error("Amount {0} cannot be represented in minor units")]
    AmountOutOfRange(Decimal),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Create an invalid-field error for a payload key
    pub fn invalid_field(field: impl Into<String>, expected: &'static str) -> Self {
        ApiError::InvalidField {
            field: field.into(),
            expected,
        }
    }

    /// True for both flavours of malformed payload
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ApiError::MalformedPayload(_) | ApiError::InvalidField { .. }
        )
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }

    /// Get error code
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ApiError::Authentication(_) => ErrorCode::InvalidSignature,
            ApiError::MalformedPayload(_) => ErrorCode::MalformedPayload,
            ApiError::InvalidField { .. } => ErrorCode::InvalidFieldType,
            ApiError::AmountOutOfRange(_) => ErrorCode::AmountOutOfRange,
            ApiError::Configuration(_) => ErrorCode::ConfigurationError,
            ApiError::Ledger(_) => ErrorCode::LedgerUnavailable,
            ApiError::Internal(_) => ErrorCode::InternalServerError,
        }
    }

    /// Get error details
    fn error_details(&self) -> Option<String> {
        match self {
            ApiError::MalformedPayload(details) => Some(details.clone()),
            ApiError::InvalidField { expected, .. } => Some(format!("expected {}", expected)),
            _ => None,
        }
    }

    /// Get field name for validation errors
    fn error_field(&self) -> Option<String> {
        match self {
            ApiError::InvalidField { field, .. } => Some(field.clone()),
            _ => None,
        }
    }

    /// Get status code
    ///
    /// 401 is reserved for signature failures. Business declines never reach
    /// this type; they are ordinary 200 replies.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,

            ApiError::MalformedPayload(_) | ApiError::InvalidField { .. } => {
                StatusCode::BAD_REQUEST
            }

            ApiError::Ledger(_) => StatusCode::BAD_GATEWAY,

            ApiError::AmountOutOfRange(_)
            | ApiError::Configuration(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log error with appropriate level; the request span supplies the request id
    fn log_error(&self) {
        match self.status_code() {
            status if status.is_server_error() => {
                error!(
                    error = %self,
                    "Server error occurred"
                );
            }
            status if status.is_client_error() => {
                warn!(
                    error = %self,
                    "Client error occurred"
                );
            }
            _ => {}
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        self.log_error();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code,
                code_number: code.code(),
                message: code.message().to_string(),
                details: self.error_details(),
                field: self.error_field(),
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(error_response)).into_response()
    }
}
