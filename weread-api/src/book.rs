//! Book detail, chapter, and reading-progress APIs.
//!
//! # Endpoints
//!
//! ## `book_info`: `GET /web/book/info?bookId=...`
//!
//! ```json
//! { "bookId": "3300", "title": "三体", "author": "刘慈欣", "newRating": 856 }
//! ```
//!
//! `newRating` is in hundredths; see [`format_rating`](crate::format::format_rating).
//!
//! ## `chapters`: `POST /web/book/chapterInfos`
//!
//! Request: `{ "bookIds": ["3300"] }`
//!
//! Response: `{ "data": [{ "bookId": "3300", "updated": [{ "chapterUid": 1, "title": "..." }] }] }`
//!
//! ## `progress`: `GET /book/readinfo?bookId=...`
//!
//! Needs the app headers `baseapi`, `appver`, `basever`, `osver`; the response
//! holds `readingProgress`, `readingTime` (seconds) and finish dates.

use serde_json::Value;

use crate::client::WereadClient;
use crate::error::Result;
use crate::operation::Operation;

impl WereadClient {
    /// Metadata of one book: title, author, cover, rating, intro.
    pub async fn book_info(&self, book_id: &str) -> Result<Value> {
        self.run(&Operation::BookInfo {
            book_id: book_id.to_owned(),
        })
        .await
    }

    /// Chapter list of one book.
    pub async fn chapters(&self, book_id: &str) -> Result<Value> {
        self.run(&Operation::Chapters {
            book_id: book_id.to_owned(),
        })
        .await
    }

    /// Reading progress, reading time and finish state of one book.
    pub async fn progress(&self, book_id: &str) -> Result<Value> {
        self.run(&Operation::Progress {
            book_id: book_id.to_owned(),
        })
        .await
    }
}
