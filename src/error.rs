//! Error handling for burl

use crate::http::Request;
use thiserror::Error;

/// Main error type for burl operations
#[derive(Error, Debug)]
pub enum BurlError {
    #[error("Invalid URL: {0}")]
    MalformedUrl(String),

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Interrupted while waiting between attempts")]
    InterruptedWait,

    #[error("Request has not been executed yet")]
    NotYetExecuted,

    #[error("Request has already been executed")]
    AlreadyExecuted,

    #[error("Could not decode response body as {target}: {message}")]
    Decode {
        target: &'static str,
        message: String,
    },

    #[error("Could not encode request body: {0}")]
    Encode(String),

    #[error(
        "Received response code {} for {} to {}",
        status_code(.0),
        .0.method_ref(),
        target_url(.0)
    )]
    StatusCode(Box<Request>),

    #[error("Background worker lost: {0}")]
    WorkerLost(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BurlError {
    /// Wrap a transport-level failure (I/O, connection, timeout)
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        BurlError::Transport(err.into())
    }

    /// The settled request attached to a status-code error.
    pub fn request(&self) -> Option<&Request> {
        match self {
            BurlError::StatusCode(request) => Some(request),
            _ => None,
        }
    }

    /// Take ownership of the settled request attached to a status-code error.
    pub fn into_request(self) -> Option<Request> {
        match self {
            BurlError::StatusCode(request) => Some(*request),
            _ => None,
        }
    }
}

fn status_code(request: &Request) -> String {
    request
        .response_code()
        .map(|code| code.to_string())
        .unwrap_or_else(|_| "<none>".to_string())
}

fn target_url(request: &Request) -> String {
    request
        .url_with_params()
        .map(|url| url.to_string())
        .unwrap_or_default()
}

/// Result type alias for burl operations
pub type Result<T> = std::result::Result<T, BurlError>;
