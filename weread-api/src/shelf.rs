//! Bookshelf APIs.
//!
//! # Endpoints
//!
//! ## `notebook`: `GET /api/user/notebook`
//!
//! Books that carry notes, highlights or thoughts:
//!
//! ```json
//! {
//!   "synckey": 1700000000,
//!   "totalBookCount": 2,
//!   "books": [
//!     { "bookId": "3300", "book": { "title": "三体", "author": "刘慈欣" }, "noteCount": 12 }
//!   ]
//! }
//! ```
//!
//! ## `shelf`: `GET /web/shelf/sync`
//!
//! The whole shelf with per-book reading progress.

use serde_json::Value;

use crate::client::WereadClient;
use crate::error::Result;
use crate::operation::Operation;
use crate::types::BookOption;

impl WereadClient {
    /// Books that carry notes or highlights.
    pub async fn notebook(&self) -> Result<Value> {
        self.run(&Operation::Notebook).await
    }

    /// The full bookshelf with reading progress.
    pub async fn shelf(&self) -> Result<Value> {
        self.run(&Operation::Shelf).await
    }

    /// Books from the notebook shelf whose `"title - author"` label contains
    /// `filter` (case-insensitive). An empty filter returns every book.
    pub async fn search_books(&self, filter: Option<&str>) -> Result<Vec<BookOption>> {
        let resp = self.notebook().await?;
        Ok(book_options(&resp, filter))
    }

    /// Credential test: one notebook call that must succeed.
    pub async fn validate_credentials(&self) -> Result<()> {
        self.notebook().await.map(|_| ())
    }
}

pub(crate) fn book_options(resp: &Value, filter: Option<&str>) -> Vec<BookOption> {
    let Some(books) = resp["books"].as_array() else {
        return Vec::new();
    };
    let filter = filter
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase);

    books
        .iter()
        .filter_map(|entry| {
            let book = if entry["book"].is_object() { &entry["book"] } else { entry };
            let id = entry["bookId"].as_str().or_else(|| book["bookId"].as_str())?;
            let title = book["title"].as_str().unwrap_or("");
            let name = match book["author"].as_str() {
                Some(author) if !author.is_empty() => format!("{title} - {author}"),
                _ => title.to_owned(),
            };
            Some(BookOption {
                name,
                value: id.to_owned(),
            })
        })
        .filter(|option| {
            filter
                .as_deref()
                .is_none_or(|f| option.name.to_lowercase().contains(f))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "books": [
                { "bookId": "1", "book": { "title": "三体", "author": "刘慈欣" } },
                { "bookId": "2", "book": { "title": "Rust in Action", "author": "" } },
                { "bookId": "3", "title": "Flat Entry", "author": "Someone" },
                { "book": { "title": "no id" } }
            ]
        })
    }

    #[test]
    fn maps_nested_and_flat_entries() {
        let options = book_options(&sample(), None);
        assert_eq!(
            options,
            vec![
                BookOption { name: "三体 - 刘慈欣".into(), value: "1".into() },
                BookOption { name: "Rust in Action".into(), value: "2".into() },
                BookOption { name: "Flat Entry - Someone".into(), value: "3".into() },
            ]
        );
    }

    #[test]
    fn filter_is_case_insensitive() {
        let options = book_options(&sample(), Some("RUST"));
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "2");
        assert_eq!(book_options(&sample(), Some("  ")).len(), 3);
    }

    #[test]
    fn missing_books_is_empty() {
        assert!(book_options(&json!({ "errcode": 0 }), None).is_empty());
    }
}
