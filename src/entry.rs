//! Form controller: turns what the user typed into a stored record.
//!
//! Only presence of a title is validated here. The date arrives as a real
//! calendar date (the input panel refuses anything else) and is coerced to
//! `YYYY-MM-DD` text before it reaches the store.

use chrono::{Local, NaiveDate};
use tracing::{error, warn};

use crate::feedback::Feedback;
use crate::models::{star_glyphs, Book, DEFAULT_RATING, MAX_RATING, MIN_RATING};
use crate::store::RecordStore;

/// Text form of stored dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Warning shown when the title is left blank.
pub const MISSING_TITLE: &str = "Please enter a book title!";

/// Values collected by the input panel, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub title: String,
    pub rating: u8,
}

impl Default for EntryDraft {
    /// Today, no title, and the default rating.
    fn default() -> Self {
        Self::new(Local::now().date_naive(), "", DEFAULT_RATING)
    }
}

impl EntryDraft {
    pub fn new(date: NaiveDate, title: impl Into<String>, rating: u8) -> Self {
        Self {
            date,
            title: title.into(),
            rating: rating.clamp(MIN_RATING, MAX_RATING),
        }
    }

    /// Normalize the draft into a record, or `None` when the title is blank.
    pub fn to_book(&self) -> Option<Book> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Book::new(
            self.date.format(DATE_FORMAT).to_string(),
            title,
            self.rating,
        ))
    }
}

/// Append the draft to the store. A blank title is rejected with a warning and
/// leaves the store untouched. The caller is expected to reload the list after
/// a successful submission.
pub fn submit(store: &RecordStore, draft: &EntryDraft) -> Feedback {
    let Some(book) = draft.to_book() else {
        warn!("submission rejected: empty title");
        return Feedback::warning(MISSING_TITLE);
    };

    let message = format!("'{}' ({}) saved!", book.title, star_glyphs(book.rating));
    match store.append(book) {
        Ok(_) => Feedback::success(message),
        Err(err) => {
            error!(error = %err, "failed to save record");
            Feedback::error(format!("Could not save the record: {err}"))
        }
    }
}
