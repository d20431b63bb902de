//! Error taxonomy for the record lifecycle and its HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use contact_form_types::ErrorResponse;
use thiserror::Error;

/// Failures of the flat record store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Io(#[from] std::io::Error),

    #[error("store corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Failures of the notification transport.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Email configuration is incomplete")]
    Unconfigured,

    #[error("invalid email: {0}")]
    Message(String),

    #[error("email transport failed: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    /// Body the framework couldn't decode, with the status it chose.
    #[error("{1}")]
    MalformedPayload(StatusCode, String),

    #[error("Visitor {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Notification(#[from] NotifyError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::MalformedPayload(status, _) => *status,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::Notification(_) | LedgerError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text shown to the HTTP client. Store internals stay in the log.
    fn detail(&self) -> String {
        match self {
            LedgerError::NotFound(_) => "Visitor not found".to_string(),
            LedgerError::Notification(NotifyError::Unconfigured) => self.to_string(),
            LedgerError::Notification(_) => "Failed to send email".to_string(),
            LedgerError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<JsonRejection> for LedgerError {
    fn from(rejection: JsonRejection) -> Self {
        LedgerError::MalformedPayload(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        match &self {
            LedgerError::Store(e) => log::error!("Record store failure: {}", e),
            LedgerError::Notification(e) => log::error!("Notification failure: {}", e),
            _ => {}
        }

        let body = ErrorResponse {
            detail: self.detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
