//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// WeRead web origin. Also the target of the session refresh request.
pub const BASE_URL: &str = "https://weread.qq.com";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// CookieCloud domains searched for WeRead cookies, in priority order.
pub const COOKIE_DOMAINS: [&str; 3] = [".weread.qq.com", "weread.qq.com", ".qq.com"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API origin, without trailing slash.
    pub base_url: String,

    /// User-Agent used when a credential leaves it empty.
    pub user_agent: String,

    /// Attempts per call, including the first (minimum 1).
    pub max_attempts: u32,

    /// Backoff base; the wait after attempt `n` is `n * retry_delay_ms`.
    pub retry_delay_ms: u64,

    /// Per-request timeout for WeRead and CookieCloud calls.
    pub timeout_secs: u64,

    /// CookieCloud domain priority.
    pub cookie_domains: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_attempts: 3,
            retry_delay_ms: 1000,
            timeout_secs: 30,
            cookie_domains: COOKIE_DOMAINS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ClientConfig {
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait before the attempt following `attempt` (1-indexed).
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_delay_ms.saturating_mul(u64::from(attempt)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(crate) fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
