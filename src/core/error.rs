use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use rust_decimal::Decimal;

use crate::modules::payments::models::{PaymentId, PaymentStatus};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Missing or malformed gateway credentials and settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider returned a non-2xx status or could not be reached
    #[error("Provider communication error: {0}")]
    ProviderCommunication(String),

    /// Callback is missing a required field or carries an invalid value
    #[error("Validation error: {0}")]
    Validation(String),

    /// Callback does not match the stored payment
    #[error("Integrity error: {0}")]
    Integrity(#[from] IntegrityViolation),

    /// Provider reported a final status other than success
    #[error("Payment {payment_id} declined by provider with status {status}")]
    Declined { payment_id: PaymentId, status: String },

    /// Operation the adapter does not implement
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Ways a callback can disagree with the payment ledger
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityViolation {
    #[error("payment {0} not found")]
    UnknownPayment(String),

    #[error("amount mismatch for payment {payment_id}: expected {expected}, got {actual}")]
    AmountMismatch {
        payment_id: PaymentId,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("currency mismatch for payment {payment_id}: expected {expected}, got {actual}")]
    CurrencyMismatch {
        payment_id: PaymentId,
        expected: String,
        actual: String,
    },

    #[error("payment {payment_id} is {status} and cannot be completed")]
    NotPayable {
        payment_id: PaymentId,
        status: PaymentStatus,
    },
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ProviderCommunication(_) => StatusCode::BAD_GATEWAY,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Integrity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Declined { .. } => StatusCode::PAYMENT_REQUIRED,
            AppError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::ProviderCommunication(format!("timeout: {}", e))
        } else if e.is_connect() {
            AppError::ProviderCommunication(format!("connection failed: {}", e))
        } else {
            AppError::ProviderCommunication(e.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for AppError {
    fn from(e: reqwest_middleware::Error) -> Self {
        match e {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => {
                AppError::ProviderCommunication(format!("middleware: {}", e))
            }
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        AppError::ProviderCommunication(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Payment the failure can be attributed to, if the adapter got that far
    pub fn payment_id(&self) -> Option<PaymentId> {
        match self {
            AppError::Declined { payment_id, .. } => Some(*payment_id),
            AppError::Integrity(violation) => match violation {
                IntegrityViolation::UnknownPayment(_) => None,
                IntegrityViolation::AmountMismatch { payment_id, .. }
                | IntegrityViolation::CurrencyMismatch { payment_id, .. }
                | IntegrityViolation::NotPayable { payment_id, .. } => Some(*payment_id),
            },
            _ => None,
        }
    }
}
