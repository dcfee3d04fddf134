//! WeRead (微信读书) web API client.
//!
//! Provides authenticated access to the WeRead web API: bookshelf, book
//! details, notes, highlights, reviews, chapters and reading progress.
//!
//! # Authentication
//!
//! Every call needs a logged-in `weread.qq.com` cookie (`wr_vid`, `wr_skey`,
//! ...). It comes either from a manually pasted cookie or from a CookieCloud
//! account, whose cookies are cached in memory for 12 hours.
//!
//! ```no_run
//! use weread_api::{Credentials, WereadClient};
//!
//! # async fn run() -> weread_api::Result<()> {
//! let credentials = Credentials::remote_sync(
//!     "https://cookiecloud.example.com",
//!     "my-uuid",
//!     "my-password",
//!     weread_api::config::DEFAULT_USER_AGENT,
//! )
//! .with_manual_fallback("wr_vid=123; wr_skey=abc", "");
//!
//! let client = WereadClient::new(credentials)?;
//! let shelf = client.notebook().await?;
//! # let _ = shelf;
//! # Ok(())
//! # }
//! ```
//!
//! # API endpoint mapping
//!
//! | Method                              | Endpoint                      | Description                 |
//! |-------------------------------------|-------------------------------|-----------------------------|
//! | [`WereadClient::notebook`]          | `GET /api/user/notebook`      | Books with notes            |
//! | [`WereadClient::shelf`]             | `GET /web/shelf/sync`         | Full bookshelf              |
//! | [`WereadClient::search_books`]      | (uses `notebook`)             | Book picker options         |
//! | [`WereadClient::book_info`]         | `GET /web/book/info`          | Book metadata               |
//! | [`WereadClient::chapters`]          | `POST /web/book/chapterInfos` | Chapter list                |
//! | [`WereadClient::progress`]          | `GET /book/readinfo`          | Reading progress            |
//! | [`WereadClient::notes`]             | `GET /web/review/list`        | Notes and thoughts          |
//! | [`WereadClient::bookmarks`]         | `GET /web/book/bookmarklist`  | Highlights                  |
//! | [`WereadClient::reviews`]           | `GET /web/review/list/best`   | Popular reviews             |
//!
//! # Errors and retries
//!
//! See [`WereadClient::execute`]. Session-expired codes are never retried;
//! other business errors and transport failures are retried up to
//! [`ClientConfig::max_attempts`](config::ClientConfig::max_attempts) times.

mod book;
pub mod cache;
pub mod classify;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod format;
mod notes;
pub mod operation;
pub mod request;
mod shelf;
pub mod types;

pub use cache::{CookieCache, SystemClock};
pub use client::{ResolvedSession, SessionOrigin, WereadClient};
pub use config::ClientConfig;
pub use credential::{CookieFetcher, Credential, Credentials};
pub use error::{Result, WereadError};
pub use operation::Operation;
pub use request::RequestSpec;
