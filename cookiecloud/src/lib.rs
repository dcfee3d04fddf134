//! CookieCloud client: fetches a browser cookie bundle from a CookieCloud
//! server and turns it into a `Cookie` header for one site.
//!
//! ```no_run
//! # async fn run() -> cookiecloud::Result<()> {
//! let client = cookiecloud::CookieCloudClient::new()?;
//! let cookie = client
//!     .fetch_cookie("https://cc.example.com", "uuid", "password", &["weread.qq.com"])
//!     .await?;
//! # let _ = cookie;
//! # Ok(())
//! # }
//! ```

mod bundle;
mod cipher;
mod client;
pub mod error;

pub use bundle::{CookieBundle, CookieRecord, DomainCookies, NamedCookie};
pub use cipher::{decrypt, derive_key_iv, derive_password, encrypt, encrypt_with_salt};
pub use client::{CookieCloudClient, FetchMode};
pub use error::{CookieCloudError, Result};
