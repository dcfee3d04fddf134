//! HTTP client for a CookieCloud server.
//!
//! # Endpoints
//!
//! ## Encrypted (default): `GET {server}/get/{uuid}`
//!
//! ```json
//! { "encrypted": "U2FsdGVkX1..." }
//! ```
//!
//! The blob is decrypted with [`derive_password`](crate::derive_password)`(uuid, password)`.
//!
//! ## Server-decrypted (legacy): `POST {server}/get/{uuid}`
//!
//! Form body `password=...`; the server answers with the plain bundle:
//!
//! ```json
//! { "cookie_data": { "weread.qq.com": [{ "name": "wr_vid", "value": "..." }] } }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::bundle::CookieBundle;
use crate::cipher::{decrypt, derive_password};
use crate::error::{CookieCloudError, Result};

/// How the bundle is retrieved from the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// Download the encrypted blob and decrypt it locally.
    #[default]
    Encrypted,
    /// Send the password and let the server decrypt.
    ServerDecrypted,
}

#[derive(Deserialize)]
struct EncryptedEnvelope {
    encrypted: Option<String>,
}

/// Async CookieCloud client.
#[derive(Debug, Clone)]
pub struct CookieCloudClient {
    http: Client,
    mode: FetchMode,
}

impl CookieCloudClient {
    /// Create a client with a 30 second request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            mode: FetchMode::default(),
        })
    }

    /// Switch between local decryption and the server-decrypted legacy endpoint.
    #[must_use]
    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fetch and decode the full cookie bundle.
    pub async fn fetch_bundle(&self, server: &str, uuid: &str, password: &str) -> Result<CookieBundle> {
        let mut missing = Vec::new();
        for (name, value) in [("server", server), ("uuid", uuid), ("password", password)] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        if !missing.is_empty() {
            return Err(CookieCloudError::Config(format!("missing {}", missing.join(", "))));
        }

        let url = format!("{}/get/{uuid}", server.trim_end_matches('/'));
        debug!(%url, mode = ?self.mode, "fetching CookieCloud bundle");

        let req = match self.mode {
            FetchMode::Encrypted => self.http.get(&url),
            FetchMode::ServerDecrypted => self.http.post(&url).form(&[("password", password)]),
        };
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CookieCloudError::Status {
                status: status.as_u16(),
                url,
            });
        }

        match self.mode {
            FetchMode::Encrypted => {
                let envelope: EncryptedEnvelope = resp.json().await?;
                let encrypted = envelope
                    .encrypted
                    .filter(|e| !e.is_empty())
                    .ok_or_else(|| CookieCloudError::Format("response has no `encrypted` field".into()))?;
                let plaintext = decrypt(&derive_password(uuid, password), &encrypted)?;
                CookieBundle::from_json(&plaintext)
            }
            FetchMode::ServerDecrypted => Ok(resp.json().await?),
        }
    }

    /// Fetch the bundle and build a `Cookie` header for the first matching domain
    /// in `domains`.
    pub async fn fetch_cookie(
        &self,
        server: &str,
        uuid: &str,
        password: &str,
        domains: &[&str],
    ) -> Result<String> {
        let bundle = self.fetch_bundle(server, uuid, password).await?;
        bundle.cookie_header(domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOMAINS: &[&str] = &[".weread.qq.com", "weread.qq.com", ".qq.com"];

    // `openssl enc -aes-256-cbc -md md5 -S a1b2c3d4e5f60718`, password
    // derive_password("test-uuid", "secret").
    const WEREAD_BLOB: &str = "U2FsdGVkX1+hssPU5fYHGLgzR8vmm6j701/iVDsPuGcHV2BQPpoRVPeTQ6SEdBfFPMEWSvzjYdo5q+jWn5eBGj0hSwZwt+8ypf3OzgMfqPBFAhIF1bYtBuOClBnhWjAU6Ap7+D111o2bLEqbX1UBq3rQWborwP887s2m0Lfs9A4b6MBZlqkYz01XDyPzauFM1Lw8u97tdJZVSIC6Bu4voa7BQUNkr1+HuvaAoRtKx/HMpGqsbuN7EcVcf5QBwQk2Jg13wSCXD8pBnxHR4yce9McdqYk2AiX+AbWF4T8otj1OpCZyAw9PPOKNjdADA1CYqArf0fF0q6IxhhMBrp6IPg==";
    const FOREIGN_BLOB: &str = "U2FsdGVkX1+hssPU5fYHGLgzR8vmm6j701/iVDsPuGev7NEYAR7ZUi8IzHf3+idaBMt/03673xRzZTqFetDhH1qA56xF49E5CyYA4mqhuYo=";

    #[tokio::test]
    async fn test_fetch_encrypted_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get/test-uuid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "encrypted": WEREAD_BLOB
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CookieCloudClient::new().unwrap();
        // Trailing slash on the server address is tolerated.
        let cookie = client
            .fetch_cookie(&format!("{}/", server.uri()), "test-uuid", "secret", DOMAINS)
            .await
            .unwrap();
        assert_eq!(cookie, "wr_vid=123; wr_skey=abc");
    }

    #[tokio::test]
    async fn test_fetch_reports_present_domains() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/get/test-uuid"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "encrypted": FOREIGN_BLOB
            })))
            .mount(&server)
            .await;

        let client = CookieCloudClient::new().unwrap();
        let err = client
            .fetch_cookie(&server.uri(), "test-uuid", "secret", DOMAINS)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("example.org"));
        assert!(matches!(err, CookieCloudError::NoData { .. }));
    }

    #[tokio::test]
    async fn test_server_decrypted_mode() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get/u1"))
            .and(body_string_contains("password=pw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cookie_data": { "weread.qq.com": [{ "name": "wr_vid", "value": "7" }] }
            })))
            .mount(&server)
            .await;

        let client = CookieCloudClient::new()
            .unwrap()
            .with_mode(FetchMode::ServerDecrypted);
        let cookie = client
            .fetch_cookie(&server.uri(), "u1", "pw", DOMAINS)
            .await
            .unwrap();
        assert_eq!(cookie, "wr_vid=7");
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CookieCloudClient::new().unwrap();
        let err = client
            .fetch_cookie(&server.uri(), "test-uuid", "secret", DOMAINS)
            .await
            .unwrap_err();
        assert!(matches!(err, CookieCloudError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_missing_config_fields() {
        let client = CookieCloudClient::new().unwrap();
        let err = client
            .fetch_cookie("https://cc.example", "", " ", DOMAINS)
            .await
            .unwrap_err();
        match err {
            CookieCloudError::Config(msg) => assert_eq!(msg, "missing uuid, password"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
