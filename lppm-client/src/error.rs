//! Client error types

use http::StatusCode;
use thiserror::Error;
use validator::ValidationErrors;

use crate::storage::StorageError;

/// The two failure categories a view cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The API call failed (transport, server rejection, bad response)
    Api,
    /// The payload was rejected before any request was sent
    Validation,
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with `success: false`
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// Authentication required or token rejected
    #[error("{0}")]
    Unauthorized(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client-side validation failed
    #[error("{0}")]
    Validation(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No session token available
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Api,
        }
    }

    /// Whether the session must be dropped
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::NotAuthenticated)
    }

    /// Map a failed HTTP status without a readable envelope
    pub fn from_status(status: StatusCode, text: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(non_empty_or(text, "Unauthorized")),
            StatusCode::FORBIDDEN => Self::Forbidden(text),
            StatusCode::NOT_FOUND => Self::NotFound(text),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Api {
                status,
                message: non_empty_or(text, status.as_str()),
            },
            _ => Self::Internal(non_empty_or(text, status.as_str())),
        }
    }
}

fn non_empty_or(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(validation_message(&errors))
    }
}

/// One human-readable line per failed rule, sorted by field
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut lines: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid ({})", e.code),
            })
        })
        .collect();
    lines.sort();
    lines.dedup();

    if lines.is_empty() {
        "Validation failed".to_string()
    } else {
        lines.join("; ")
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::client::LoginRequest;
    use validator::Validate;

    #[test]
    fn test_validation_errors_become_validation_kind() {
        let err: ClientError = LoginRequest::new("nope", "").validate().unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let message = err.to_string();
        assert!(message.contains("Email is not valid"));
        assert!(message.contains("Password is required"));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            ClientError::Unauthorized(m) if m == "Unauthorized"
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, "gone".into()),
            ClientError::NotFound(_)
        ));
        // server-side rejections are not local validation
        let err = ClientError::from_status(StatusCode::BAD_REQUEST, "Tahun tidak valid".into());
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.to_string(), "Tahun tidak valid");
        let err = ClientError::from_status(StatusCode::UNPROCESSABLE_ENTITY, String::new());
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.to_string(), "422");

        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, String::new());
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.to_string(), "Internal error: 502");
    }

    #[test]
    fn test_api_error_displays_server_message() {
        let err = ClientError::Api {
            status: StatusCode::OK,
            message: "Proposal not found".into(),
        };
        assert_eq!(err.to_string(), "Proposal not found");
        assert!(!err.is_auth_failure());
    }
}
