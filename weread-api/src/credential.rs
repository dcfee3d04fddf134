//! Credential sources and the remote cookie fetcher seam.
//!
//! A [`Credentials`] value is what the host's credential store hands over: one
//! or more [`Credential`] sources plus an opaque identity token. Resolution
//! always tries CookieCloud sources before manual ones.

use async_trait::async_trait;
use cookiecloud::{CookieCloudClient, CookieCloudError};
use md5::{Digest, Md5};

/// A cookie pasted by the user, e.g. `wr_vid=123; wr_skey=abc`.
#[derive(Clone, PartialEq, Eq)]
pub struct ManualCookie {
    pub cookie: String,
    pub user_agent: String,
}

/// A CookieCloud account holding the user's browser cookies.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteSync {
    pub server: String,
    pub uuid: String,
    pub password: String,
    pub user_agent: String,
}

impl std::fmt::Debug for ManualCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualCookie")
            .field("cookie", &format_args!("<{} bytes>", self.cookie.len()))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl std::fmt::Debug for RemoteSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSync")
            .field("server", &self.server)
            .field("uuid", &self.uuid)
            .field("password", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Where a session cookie can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Manual(ManualCookie),
    RemoteSync(RemoteSync),
}

impl Credential {
    /// Lower resolves first.
    fn priority(&self) -> u8 {
        match self {
            Self::RemoteSync(_) => 0,
            Self::Manual(_) => 1,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Manual(_) => "manual cookie",
            Self::RemoteSync(_) => "CookieCloud",
        }
    }

    pub fn user_agent(&self) -> &str {
        match self {
            Self::Manual(m) => &m.user_agent,
            Self::RemoteSync(r) => &r.user_agent,
        }
    }
}

/// Credential sources for one client, with the identity used to key cached cookies.
#[derive(Debug, Clone)]
pub struct Credentials {
    sources: Vec<Credential>,
    identity: String,
}

impl Credentials {
    pub fn manual(cookie: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self::from_sources(vec![Credential::Manual(ManualCookie {
            cookie: cookie.into(),
            user_agent: user_agent.into(),
        })])
    }

    pub fn remote_sync(
        server: impl Into<String>,
        uuid: impl Into<String>,
        password: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self::from_sources(vec![Credential::RemoteSync(RemoteSync {
            server: server.into(),
            uuid: uuid.into(),
            password: password.into(),
            user_agent: user_agent.into(),
        })])
    }

    /// Build from arbitrary sources. The identity defaults to a digest of all
    /// source fields, so editing a credential in place changes it.
    pub fn from_sources(sources: Vec<Credential>) -> Self {
        let identity = digest_identity(&sources);
        Self { sources, identity }
    }

    /// Add a manual cookie used when CookieCloud fails.
    #[must_use]
    pub fn with_manual_fallback(mut self, cookie: impl Into<String>, user_agent: impl Into<String>) -> Self {
        self.sources.push(Credential::Manual(ManualCookie {
            cookie: cookie.into(),
            user_agent: user_agent.into(),
        }));
        self.identity = digest_identity(&self.sources);
        self
    }

    /// Use the host-provided identity token instead of the derived digest.
    #[must_use]
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Sources in resolution order: CookieCloud first, then manual.
    pub fn ordered(&self) -> Vec<&Credential> {
        let mut ordered: Vec<&Credential> = self.sources.iter().collect();
        ordered.sort_by_key(|c| c.priority());
        ordered
    }
}

fn digest_identity(sources: &[Credential]) -> String {
    let mut hasher = Md5::new();
    for source in sources {
        match source {
            Credential::Manual(m) => {
                hasher.update(b"manual\0");
                hasher.update(m.cookie.as_bytes());
            }
            Credential::RemoteSync(r) => {
                hasher.update(b"remote\0");
                hasher.update(r.server.as_bytes());
                hasher.update(b"\0");
                hasher.update(r.uuid.as_bytes());
                hasher.update(b"\0");
                hasher.update(r.password.as_bytes());
            }
        }
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Retrieves a cookie header for a CookieCloud account.
#[async_trait]
pub trait CookieFetcher: Send + Sync {
    async fn fetch_cookie(&self, remote: &RemoteSync) -> Result<String, CookieCloudError>;
}

/// [`CookieCloudClient`] bound to a domain priority list.
#[derive(Debug, Clone)]
pub struct CookieCloudFetcher {
    client: CookieCloudClient,
    domains: Vec<String>,
}

impl CookieCloudFetcher {
    pub fn new(client: CookieCloudClient, domains: Vec<String>) -> Self {
        Self { client, domains }
    }
}

#[async_trait]
impl CookieFetcher for CookieCloudFetcher {
    async fn fetch_cookie(&self, remote: &RemoteSync) -> Result<String, CookieCloudError> {
        let domains: Vec<&str> = self.domains.iter().map(String::as_str).collect();
        self.client
            .fetch_cookie(&remote.server, &remote.uuid, &remote.password, &domains)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_sources_resolve_first() {
        let creds = Credentials::manual("a=1", "ua")
            .with_manual_fallback("b=2", "ua");
        let mut sources = creds.sources.clone();
        sources.push(Credential::RemoteSync(RemoteSync {
            server: "https://cc".into(),
            uuid: "u".into(),
            password: "p".into(),
            user_agent: "ua".into(),
        }));
        let creds = Credentials::from_sources(sources);
        let kinds: Vec<_> = creds.ordered().iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec!["CookieCloud", "manual cookie", "manual cookie"]);
    }

    #[test]
    fn identity_tracks_edits() {
        let a = Credentials::remote_sync("https://cc", "u", "p1", "ua");
        let b = Credentials::remote_sync("https://cc", "u", "p2", "ua");
        assert_ne!(a.identity(), b.identity());
        assert_eq!(a.identity(), Credentials::remote_sync("https://cc", "u", "p1", "ua").identity());
        assert_eq!(a.with_identity("cred-42").identity(), "cred-42");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::remote_sync("https://cc", "u", "hunter2", "ua")
            .with_manual_fallback("wr_skey=topsecret", "ua");
        let text = format!("{creds:?}");
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("topsecret"));
        assert!(text.contains("https://cc"));
    }
}
