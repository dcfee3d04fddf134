use thiserror::Error;

#[derive(Debug, Error)]
pub enum CookieCloudError {
    /// Server address, UUID or password is missing.
    #[error("CookieCloud configuration is incomplete: {0}")]
    Config(String),
    /// The encrypted payload is not a valid salted blob, including bad base64.
    #[error("malformed encrypted payload: {0}")]
    Format(String),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("CookieCloud returned HTTP {status} for {url}")]
    Status { status: u16, url: String },
    /// No cookie entries for any of the requested domains.
    #[error("no cookies found for the requested domains (payload contains: {})", present.join(", "))]
    NoData { present: Vec<String> },
}

pub type Result<T> = std::result::Result<T, CookieCloudError>;
