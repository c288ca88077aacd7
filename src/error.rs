// Error taxonomy shared by the gateway, the managers and the controller.
// Library code returns `crate::Result`; only the terminal front-end and the
// binary reach for `anyhow`.

use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Unified error type for the Fit4Ever client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Bad credentials or an expired/invalid token.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-2xx response from the API.
    #[error("HTTP {status}: {detail}")]
    Http { status: StatusCode, detail: String },

    /// Transport failure (connection refused, timeout, TLS...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Client-side validation failure, raised before any request is sent.
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The API answered 204/empty where a payload was required.
    #[error("Empty response from API")]
    EmptyResponse,

    #[error("Token store error: {0}")]
    TokenStore(#[from] std::io::Error),
}

impl ClientError {
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        ClientError::Auth(msg.to_string())
    }

    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        ClientError::Validation(msg.to_string())
    }

    /// True for errors that mean the current token is no longer usable.
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }

    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_status_and_detail() {
        let err = ClientError::Http {
            status: StatusCode::BAD_REQUEST,
            detail: "title must not be blank".into(),
        };
        assert_eq!(err.to_string(), "HTTP 400 Bad Request: title must not be blank");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(!err.is_auth());
    }

    #[test]
    fn validation_error_is_shown_verbatim() {
        let err = ClientError::validation("Please add at least one exercise");
        assert_eq!(err.to_string(), "Please add at least one exercise");
    }
}
