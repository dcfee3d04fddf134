//! HTTP client for the WeRead web API.
//!
//! Every call goes through [`WereadClient::execute`]:
//!
//! 1. Resolve a cookie: CookieCloud sources first (cache, then fetch), manual
//!    cookies as fallback.
//! 2. Send the request with browser-like headers pinned to `weread.qq.com`.
//! 3. Classify the JSON body. `errcode` 0 or absent is success.
//! 4. Session-expired codes (`-2012`, `-2010`) fail immediately and drop the
//!    cached CookieCloud cookie. Other failures are retried after a refresh
//!    request to the home page and a linear backoff.
//!
//! # Response format
//!
//! ```json
//! { "errcode": -2012, "errmsg": "登录超时" }
//! ```
//!
//! Success bodies are endpoint-specific and carry no `errcode`.

use std::sync::Arc;

use cookiecloud::CookieCloudClient;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT,
};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::cache::CookieCache;
use crate::classify::{ApiStatus, classify};
use crate::config::ClientConfig;
use crate::credential::{CookieCloudFetcher, CookieFetcher, Credential, Credentials};
use crate::error::{Result, WereadError};
use crate::request::RequestSpec;

const SITE_REFERER: &str = "https://weread.qq.com/";
const SITE_ORIGIN: &str = "https://weread.qq.com";
const ACCEPT_VALUE: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE_VALUE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

/// Which source produced the cookie of a [`ResolvedSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOrigin {
    Manual,
    RemoteSync { server: String, uuid: String },
}

/// Cookie and user agent used for one `execute` call.
#[derive(Clone)]
pub struct ResolvedSession {
    pub cookie: String,
    pub user_agent: String,
    pub origin: SessionOrigin,
}

impl std::fmt::Debug for ResolvedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSession")
            .field("cookie", &format_args!("<{} bytes>", self.cookie.len()))
            .field("user_agent", &self.user_agent)
            .field("origin", &self.origin)
            .finish()
    }
}

/// Async client for the WeRead web API.
///
/// API methods live in separate modules (`shelf`, `book`, `notes`) as
/// `impl WereadClient` blocks.
pub struct WereadClient {
    http: Client,
    config: ClientConfig,
    credentials: Credentials,
    cache: Arc<CookieCache>,
    fetcher: Arc<dyn CookieFetcher>,
}

impl WereadClient {
    /// Create a client with default configuration and a private cookie cache.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a client with `config` and a private cookie cache.
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        let cookiecloud = CookieCloudClient::with_timeout(config.timeout())?;
        let fetcher = Arc::new(CookieCloudFetcher::new(
            cookiecloud,
            config.cookie_domains.clone(),
        ));
        Ok(Self {
            http,
            config,
            credentials,
            cache: Arc::new(CookieCache::new()),
            fetcher,
        })
    }

    /// Share a cookie cache between clients.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<CookieCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the CookieCloud fetcher.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn CookieFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Cookie cache backing CookieCloud sources.
    pub fn cache(&self) -> &Arc<CookieCache> {
        &self.cache
    }

    /// Pick a cookie, trying CookieCloud sources before manual ones.
    pub async fn resolve_session(&self) -> Result<ResolvedSession> {
        let mut failures = Vec::new();
        for source in self.credentials.ordered() {
            match self.resolve_source(source).await {
                Ok(session) => return Ok(session),
                Err(e) => {
                    warn!(source = source.kind(), error = %e, "credential source failed");
                    failures.push(format!("{}: {e}", source.kind()));
                }
            }
        }

        if failures.is_empty() {
            return Err(WereadError::Credential("no credential source configured".into()));
        }
        Err(WereadError::Credential(failures.join("; ")))
    }

    async fn resolve_source(&self, source: &Credential) -> Result<ResolvedSession> {
        match source {
            Credential::Manual(manual) => {
                if manual.cookie.trim().is_empty() {
                    return Err(WereadError::Config("manual cookie is empty".into()));
                }
                cookie_header(&manual.cookie)?;
                Ok(ResolvedSession {
                    cookie: manual.cookie.clone(),
                    user_agent: manual.user_agent.clone(),
                    origin: SessionOrigin::Manual,
                })
            }
            Credential::RemoteSync(remote) => {
                let identity = self.credentials.identity();
                let cookie = if let Some(cookie) =
                    self.cache.get(&remote.server, &remote.uuid, identity)
                {
                    debug!(server = %remote.server, "using cached CookieCloud cookie");
                    cookie
                } else {
                    let cookie = self.fetcher.fetch_cookie(remote).await?;
                    // Unusable cookies count as a source failure and are never cached.
                    cookie_header(&cookie)?;
                    debug!(server = %remote.server, len = cookie.len(), "fetched CookieCloud cookie");
                    self.cache.set(&remote.server, &remote.uuid, &cookie, identity);
                    cookie
                };
                Ok(ResolvedSession {
                    cookie,
                    user_agent: remote.user_agent.clone(),
                    origin: SessionOrigin::RemoteSync {
                        server: remote.server.clone(),
                        uuid: remote.uuid.clone(),
                    },
                })
            }
        }
    }

    /// Convenience wrapper around [`execute`](Self::execute).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Value> {
        let mut spec = RequestSpec::new(method, path);
        for (key, value) in query {
            spec = spec.query(*key, value);
        }
        spec.body = body;
        self.execute(&spec).await
    }

    /// Send `spec` with retries and return the parsed JSON body.
    ///
    /// # Errors
    ///
    /// - [`WereadError::Credential`]: no source produced a cookie
    /// - [`WereadError::SessionExpired`]: `-2012`/`-2010`, returned on first sight
    /// - [`WereadError::Api`]: other `errcode`, after the last attempt
    /// - [`WereadError::Http`] / [`WereadError::Status`]: transport failure after the last attempt
    #[instrument(skip(self, spec), fields(method = %spec.method, path = %spec.path))]
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Value> {
        let session = self.resolve_session().await?;
        let headers = self.session_headers(&session)?;
        let max_attempts = self.config.max_attempts();
        let mut attempt = 1;

        loop {
            let err = match self.send(spec, &headers).await {
                Ok(body) => match classify(&body) {
                    ApiStatus::Success => return Ok(body),
                    ApiStatus::SessionExpired { code, message } => {
                        if let SessionOrigin::RemoteSync { server, uuid } = &session.origin {
                            self.cache.invalidate(server, uuid);
                        }
                        warn!(code, attempt, "WeRead session expired");
                        return Err(WereadError::SessionExpired { code, message });
                    }
                    ApiStatus::Business { code, message } => WereadError::Api { code, message },
                },
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };

            if attempt >= max_attempts {
                warn!(attempt, error = %err, "giving up");
                return Err(err);
            }

            let delay = self.config.backoff(attempt);
            warn!(attempt, max_attempts, ?delay, error = %err, "request failed, retrying");
            self.refresh_session(&headers).await;
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn send(&self, spec: &RequestSpec, headers: &HeaderMap) -> Result<Value> {
        let url = if spec.path.starts_with('/') {
            format!("{}{}", self.config.base_url(), spec.path)
        } else {
            format!("{}/{}", self.config.base_url(), spec.path)
        };

        let mut req = self
            .http
            .request(spec.method.clone(), &url)
            .headers(headers.clone());
        for (name, value) in &spec.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if !spec.query.is_empty() {
            req = req.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        // Error statuses may still carry an errcode worth classifying.
        let text = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<Value>(&text) {
            Ok(body) if !classify(&body).is_success() => Ok(body),
            _ => Err(WereadError::Status {
                status: status.as_u16(),
                url,
            }),
        }
    }

    /// Best-effort page view that lets WeRead rotate session tokens. The
    /// outcome is ignored.
    async fn refresh_session(&self, headers: &HeaderMap) {
        let url = format!("{}/", self.config.base_url());
        match self.http.get(&url).headers(headers.clone()).send().await {
            Ok(resp) => debug!(status = resp.status().as_u16(), "session refresh request sent"),
            Err(e) => debug!(error = %e, "session refresh request failed"),
        }
    }

    fn session_headers(&self, session: &ResolvedSession) -> Result<HeaderMap> {
        let user_agent = if session.user_agent.trim().is_empty() {
            self.config.user_agent.as_str()
        } else {
            session.user_agent.as_str()
        };

        let cookie = cookie_header(&session.cookie)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|_| WereadError::Config("invalid User-Agent".into()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
        headers.insert(REFERER, HeaderValue::from_static(SITE_REFERER));
        headers.insert(ORIGIN, HeaderValue::from_static(SITE_ORIGIN));
        headers.insert(COOKIE, cookie);
        Ok(headers)
    }
}

/// `Cookie` header value, marked sensitive so it stays out of debug output.
fn cookie_header(cookie: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(cookie)
        .map_err(|_| WereadError::Config("cookie contains invalid header characters".into()))?;
    value.set_sensitive(true);
    Ok(value)
}
