//! Resource routing: every resource/operation pair the node exposes, mapped
//! to the request it issues.

use serde_json::{Value, json};

use crate::client::WereadClient;
use crate::error::{Result, WereadError};
use crate::request::RequestSpec;

/// Default `listType` for the notes list (highlights plus thoughts).
pub const DEFAULT_NOTES_LIST_TYPE: u32 = 4;
/// Default number of popular reviews.
pub const DEFAULT_REVIEW_LIMIT: u32 = 10;

/// App headers the reading-progress endpoint expects.
const PROGRESS_HEADERS: [(&str, &str); 4] = [
    ("baseapi", "32"),
    ("appver", "8.2.5.10163885"),
    ("basever", "8.2.5.10163885"),
    ("osver", "12"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Books that have notes, highlights or thoughts.
    Notebook,
    /// The full bookshelf with reading progress.
    Shelf,
    BookInfo { book_id: String },
    Notes { book_id: String, list_type: u32 },
    Bookmarks { book_id: String },
    Progress { book_id: String },
    Reviews { book_id: String, limit: u32 },
    Chapters { book_id: String },
}

impl Operation {
    pub fn book_id(&self) -> Option<&str> {
        match self {
            Self::Notebook | Self::Shelf => None,
            Self::BookInfo { book_id }
            | Self::Notes { book_id, .. }
            | Self::Bookmarks { book_id }
            | Self::Progress { book_id }
            | Self::Reviews { book_id, .. }
            | Self::Chapters { book_id } => Some(book_id),
        }
    }

    /// Build the request. Fails when a required book ID is empty.
    pub fn request(&self) -> Result<RequestSpec> {
        if let Some(id) = self.book_id() {
            if id.trim().is_empty() {
                return Err(WereadError::Config("bookId is required".into()));
            }
        }

        let spec = match self {
            Self::Notebook => RequestSpec::get("/api/user/notebook"),
            Self::Shelf => RequestSpec::get("/web/shelf/sync"),
            Self::BookInfo { book_id } => RequestSpec::get("/web/book/info").query("bookId", book_id),
            Self::Notes { book_id, list_type } => RequestSpec::get("/web/review/list")
                .query("bookId", book_id)
                .query("listType", list_type)
                .query("listMode", 2)
                .query("syncKey", 0)
                .query("count", 0)
                .query("maxIdx", 0),
            Self::Bookmarks { book_id } => {
                RequestSpec::get("/web/book/bookmarklist").query("bookId", book_id)
            }
            Self::Progress { book_id } => {
                let mut spec = RequestSpec::get("/book/readinfo").query("bookId", book_id);
                for flag in [
                    "noteCount",
                    "readingDetail",
                    "finishedBookIndex",
                    "readingBookCount",
                    "readingBookIndex",
                    "finishedBookCount",
                    "finishedDate",
                ] {
                    spec = spec.query(flag, 1);
                }
                for (name, value) in PROGRESS_HEADERS {
                    spec = spec.header(name, value);
                }
                spec
            }
            Self::Reviews { book_id, limit } => RequestSpec::get("/web/review/list/best")
                .query("bookId", book_id)
                .query("count", limit)
                .query("maxIdx", 0)
                .query("synckey", 0),
            Self::Chapters { book_id } => {
                RequestSpec::post("/web/book/chapterInfos").json(json!({ "bookIds": [book_id] }))
            }
        };
        Ok(spec)
    }
}

impl WereadClient {
    /// Execute a routed operation and return the raw response body.
    pub async fn run(&self, operation: &Operation) -> Result<Value> {
        let spec = operation.request()?;
        self.execute(&spec).await
    }
}
