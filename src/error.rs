//! Relay error type
//!
//! Every failure on the API paths ends up here and is turned into an HTTP
//! status plus the `{"success": false, "error": ...}` envelope.

use hyper::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Resume URL is required")]
    MissingResumeUrl,

    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Request body too large (max: {max} bytes)")]
    BodyTooLarge { max: u64 },

    #[error("Failed to read request body: {0}")]
    ReadBody(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("n8n responded with status: {status} - {body}")]
    Downstream { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    /// HTTP status returned to the caller
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingResumeUrl | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ReadBody(_) | Self::Transport(_) | Self::Downstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Build the `{"success": false, "error": message}` envelope
pub fn error_envelope(message: &str) -> Value {
    json!({
        "success": false,
        "error": message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RelayError::MissingResumeUrl.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::BodyTooLarge { max: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            RelayError::Downstream {
                status: 404,
                body: "gone".to_string()
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::ReadBody("reset".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_downstream_message_embeds_status_and_text() {
        let err = RelayError::Downstream {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "n8n responded with status: 502 - Bad Gateway");
    }

    #[test]
    fn test_invalid_body_from_serde() {
        let parse_err = serde_json::from_str::<Value>("{not json").unwrap_err();
        let err: RelayError = parse_err.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Invalid JSON body: "));
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = error_envelope("Resume URL is required");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Resume URL is required");
    }
}
