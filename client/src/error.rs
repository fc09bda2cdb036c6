//! Session client error types

use thiserror::Error;

/// Errors raised while talking to the rig controller
#[derive(Debug, Error)]
pub enum RigError {
    #[error("request timed out after {duration_ms}ms during {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    #[error("connection refused: {url} - {cause}")]
    ConnectionRefused { url: String, cause: String },

    #[error("HTTP error {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("request failed: {0}")]
    RequestFailed(String),
}

impl RigError {
    /// Create a timeout error with operation context
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        RigError::Timeout {
            operation: operation.into(),
            duration_ms,
        }
    }

    /// Whether the failure is transient (network hiccup, server busy)
    /// rather than a contract violation. The page flow never retries,
    /// but operator tooling built on these calls may want to.
    pub fn is_transient(&self) -> bool {
        match self {
            RigError::Timeout { .. } => true,
            RigError::ConnectionRefused { .. } => true,
            RigError::RequestFailed(_) => true,
            RigError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            RigError::Parse(_) => false,
        }
    }
}

impl From<reqwest::Error> for RigError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RigError::Timeout {
                operation: "HTTP request".to_string(),
                duration_ms: 0, // actual budget tracked at the call site
            }
        } else if err.is_connect() {
            let url = err
                .url()
                .map(|u| u.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            RigError::ConnectionRefused {
                url,
                cause: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            RigError::HttpStatus {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            RigError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RigError {
    fn from(err: serde_json::Error) -> Self {
        RigError::Parse(err.to_string())
    }
}
