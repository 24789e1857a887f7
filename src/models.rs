//! Domain model for the reading log. A `Book` is the only entity the
//! application knows about; it mirrors one row of the CSV backing file and is
//! passed untouched between the store, the form controller and the list
//! presenter. Display-only concerns (star glyphs, deletion marks) stay out of
//! this type so nothing ephemeral ever leaks into the persisted schema.

use std::fmt;

use serde::Serialize;

/// Lowest rating the input panel accepts.
pub const MIN_RATING: u8 = 1;
/// Highest rating the input panel accepts.
pub const MAX_RATING: u8 = 5;
/// Rating assigned to rows written before the rating column existed.
pub const LEGACY_RATING: u8 = 3;
/// Rating preselected in a fresh entry form.
pub const DEFAULT_RATING: u8 = 5;
/// Glyph repeated once per rating point when a rating is shown to the user.
pub const STAR_GLYPH: char = '★';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One reading-log entry. Field order matches the column order of the backing
/// file, which lets `csv::Writer::serialize` emit rows directly.
pub struct Book {
    /// Date the book was read, kept as text. It is never parsed after being
    /// stored, so sorting operates on the raw string.
    pub date: String,
    /// Free-text title as typed by the user.
    pub title: String,
    /// Integer rating between `MIN_RATING` and `MAX_RATING`.
    pub rating: u8,
}

impl Book {
    pub fn new(date: impl Into<String>, title: impl Into<String>, rating: u8) -> Self {
        Self {
            date: date.into(),
            title: title.into(),
            rating,
        }
    }

    /// Rating rendered as a run of star glyphs.
    pub fn stars(&self) -> String {
        star_glyphs(self.rating)
    }
}

impl fmt::Display for Book {
    /// `date  title (stars)`, used by log lines and status messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {} ({})", self.date, self.title, self.stars())
    }
}

/// Repeat the star glyph once per rating point. A zero rating yields an empty
/// string rather than a placeholder.
pub fn star_glyphs(rating: u8) -> String {
    std::iter::repeat(STAR_GLYPH)
        .take(rating as usize)
        .collect()
}
