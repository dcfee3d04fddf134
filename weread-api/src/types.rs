//! Data types shaped from WeRead responses.

use serde::{Deserialize, Serialize};

/// A selectable book, as offered to the host's book picker.
///
/// Built from the notebook shelf (`/api/user/notebook`), where each entry
/// looks like `{ "bookId": "123", "book": { "title": "...", "author": "..." } }`.
/// Older responses put `title`/`author` on the entry itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookOption {
    /// `"title - author"`, or just the title when the author is unknown.
    pub name: String,
    /// WeRead book ID.
    pub value: String,
}

/// Reading time broken down for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingTime {
    pub seconds: u64,
    /// Whole minutes.
    pub minutes: u64,
    /// Hours rounded to two decimals.
    pub hours: f64,
    /// Chinese label, e.g. `1小时5分钟`.
    pub formatted: String,
}
