//! Error types for the WeRead API client.

use cookiecloud::CookieCloudError;
use thiserror::Error;

/// Errors that can occur when interacting with the WeRead API.
#[derive(Debug, Error)]
pub enum WereadError {
    /// HTTP transport error (connection refused, timeout, TLS failure,
    /// undecodable body). Retried.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response that carried no business error code. Retried.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The API reported an invalid or expired session (`-2012`, `-2010`).
    /// Never retried.
    #[error(
        "WeRead session expired (code {code}): {message}; refresh the cookie or re-sync CookieCloud, then retry"
    )]
    SessionExpired {
        /// WeRead `errcode` (not HTTP status).
        code: i64,
        /// `errmsg` as returned by the API.
        message: String,
    },

    /// Any other nonzero `errcode` in the response body. Retried.
    #[error("WeRead API error ({code}): {message}")]
    Api { code: i64, message: String },

    /// No credential source produced a usable cookie.
    #[error("no usable credentials: {0}")]
    Credential(String),

    /// Invalid caller input or configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("CookieCloud: {0}")]
    CookieCloud(#[from] CookieCloudError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WereadError {
    /// Whether the execution loop may try the request again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Api { .. })
    }

    /// Upstream business code, if the error came from a response body.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::SessionExpired { code, .. } | Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Convenience alias for `Result<T, WereadError>`.
pub type Result<T> = std::result::Result<T, WereadError>;
