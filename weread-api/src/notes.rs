//! Notes, highlights and reviews.
//!
//! # Endpoints
//!
//! ## `notes`: `GET /web/review/list?bookId=...&listType=4&listMode=2`
//!
//! Thoughts and annotated highlights. `reviews[].review.type` is 1 for
//! highlight notes and 4 for reviews/thoughts.
//!
//! ## `bookmarks`: `GET /web/book/bookmarklist?bookId=...`
//!
//! ```json
//! { "updated": [{ "bookmarkId": "...", "markText": "...", "colorStyle": 2, "createTime": 1700000000 }] }
//! ```
//!
//! ## `reviews`: `GET /web/review/list/best?bookId=...&count=10`
//!
//! Popular public reviews.

use serde_json::Value;

use crate::client::WereadClient;
use crate::error::Result;
use crate::operation::{DEFAULT_NOTES_LIST_TYPE, DEFAULT_REVIEW_LIMIT, Operation};

impl WereadClient {
    /// Notes for a book. `list_type` defaults to 4.
    pub async fn notes(&self, book_id: &str, list_type: Option<u32>) -> Result<Value> {
        self.run(&Operation::Notes {
            book_id: book_id.to_owned(),
            list_type: list_type.unwrap_or(DEFAULT_NOTES_LIST_TYPE),
        })
        .await
    }

    /// Highlights (underlines) of one book.
    pub async fn bookmarks(&self, book_id: &str) -> Result<Value> {
        self.run(&Operation::Bookmarks {
            book_id: book_id.to_owned(),
        })
        .await
    }

    /// Popular reviews. `limit` defaults to 10.
    pub async fn reviews(&self, book_id: &str, limit: Option<u32>) -> Result<Value> {
        self.run(&Operation::Reviews {
            book_id: book_id.to_owned(),
            limit: limit.unwrap_or(DEFAULT_REVIEW_LIMIT),
        })
        .await
    }
}
