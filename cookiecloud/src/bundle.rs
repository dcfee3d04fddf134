use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{CookieCloudError, Result};

/// Decrypted CookieCloud payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CookieBundle {
    /// Cookies grouped by the domain they were captured from.
    #[serde(default)]
    pub cookie_data: BTreeMap<String, DomainCookies>,
    #[serde(default)]
    pub local_storage_data: Option<serde_json::Value>,
    #[serde(default)]
    pub update_time: Option<String>,
}

/// Cookies for one domain.
///
/// Browser extensions upload a list of cookie records; older exports use a
/// map keyed by cookie name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DomainCookies {
    List(Vec<CookieRecord>),
    Named(BTreeMap<String, NamedCookie>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedCookie {
    pub value: String,
}

impl DomainCookies {
    /// `(name, value)` pairs. Lists keep payload order; named maps are
    /// sorted by cookie name.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        match self {
            Self::List(records) => records
                .iter()
                .map(|c| (c.name.as_str(), c.value.as_str()))
                .collect(),
            Self::Named(map) => map
                .iter()
                .map(|(name, c)| (name.as_str(), c.value.as_str()))
                .collect(),
        }
    }
}

impl CookieBundle {
    /// Parse the decrypted JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Domains present in the payload, sorted.
    pub fn domains(&self) -> Vec<String> {
        self.cookie_data.keys().cloned().collect()
    }

    /// Build a `Cookie` header value from the first domain in `priority` that
    /// has at least one cookie.
    pub fn cookie_header(&self, priority: &[&str]) -> Result<String> {
        for domain in priority {
            let Some(cookies) = self.cookie_data.get(*domain) else {
                continue;
            };
            let pairs = cookies.pairs();
            if pairs.is_empty() {
                continue;
            }
            tracing::debug!(domain, count = pairs.len(), "selected cookie domain");
            return Ok(pairs
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "));
        }

        Err(CookieCloudError::NoData {
            present: self.domains(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIORITY: &[&str] = &[".weread.qq.com", "weread.qq.com", ".qq.com"];

    #[test]
    fn test_list_shaped_domain() {
        let bundle = CookieBundle::from_json(
            r#"{"cookie_data":{"weread.qq.com":[
                {"name":"wr_vid","value":"123","domain":"weread.qq.com","path":"/"},
                {"name":"wr_skey","value":"abc"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(bundle.cookie_header(PRIORITY).unwrap(), "wr_vid=123; wr_skey=abc");
    }

    #[test]
    fn test_named_domain() {
        let bundle = CookieBundle::from_json(
            r#"{"cookie_data":{".weread.qq.com":{"wr_vid":{"value":"1"},"wr_skey":{"value":"k"}}}}"#,
        )
        .unwrap();
        assert_eq!(bundle.cookie_header(PRIORITY).unwrap(), "wr_skey=k; wr_vid=1");
    }

    #[test]
    fn test_priority_skips_empty_domains() {
        let bundle = CookieBundle::from_json(
            r#"{"cookie_data":{
                ".weread.qq.com":[],
                ".qq.com":[{"name":"pgv","value":"9"}],
                "weread.qq.com":[{"name":"wr_vid","value":"2"}]
            }}"#,
        )
        .unwrap();
        assert_eq!(bundle.cookie_header(PRIORITY).unwrap(), "wr_vid=2");
    }

    #[test]
    fn test_parent_domain_fallback() {
        let bundle =
            CookieBundle::from_json(r#"{"cookie_data":{".qq.com":[{"name":"pgv","value":"9"}]}}"#)
                .unwrap();
        assert_eq!(bundle.cookie_header(PRIORITY).unwrap(), "pgv=9");
    }

    #[test]
    fn test_no_matching_domain_lists_present() {
        let bundle = CookieBundle::from_json(
            r#"{"cookie_data":{"example.org":[{"name":"a","value":"b"}],"github.com":[]}}"#,
        )
        .unwrap();
        match bundle.cookie_header(PRIORITY) {
            Err(CookieCloudError::NoData { present }) => {
                assert_eq!(present, vec!["example.org", "github.com"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_cookie_data() {
        let bundle = CookieBundle::from_json("{}").unwrap();
        assert!(matches!(
            bundle.cookie_header(PRIORITY),
            Err(CookieCloudError::NoData { .. })
        ));
    }
}
