//! Column layout of the backing file and the rules for reading older layouts.
//!
//! The store always writes `date,title,rating`. Files produced before the
//! rating column existed only carry `date,title`, and files written by the
//! original web form use Korean headers; both must load without complaint.

use csv::StringRecord;

use crate::models::{Book, LEGACY_RATING, MAX_RATING, MIN_RATING};

/// Header row written to every backing file.
pub const COLUMNS: [&str; 3] = ["date", "title", "rating"];

const DATE_ALIASES: &[&str] = &["date", "날짜"];
const TITLE_ALIASES: &[&str] = &["title", "책 제목"];
const RATING_ALIASES: &[&str] = &["rating", "별점"];

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnMap {
    date: usize,
    title: usize,
    rating: Option<usize>,
}

/// Why a single row could not become a `Book`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum RowError {
    InvalidRating(String),
}

impl ColumnMap {
    /// Locate the known columns. Returns the name of the first required
    /// column that is absent. Extra columns are ignored.
    pub(crate) fn from_headers(headers: &StringRecord) -> Result<Self, &'static str> {
        let find = |aliases: &[&str]| {
            headers.iter().position(|header| {
                let header = header.trim_start_matches('\u{feff}').trim();
                aliases
                    .iter()
                    .any(|alias| header.eq_ignore_ascii_case(alias))
            })
        };

        let date = find(DATE_ALIASES).ok_or(COLUMNS[0])?;
        let title = find(TITLE_ALIASES).ok_or(COLUMNS[1])?;
        let rating = find(RATING_ALIASES);

        Ok(Self {
            date,
            title,
            rating,
        })
    }

    /// True when the file predates the rating column.
    pub(crate) fn is_legacy(&self) -> bool {
        self.rating.is_none()
    }

    /// Build a `Book` from one data row. Short rows are tolerated; absent
    /// cells read as empty text and an absent rating falls back to the
    /// legacy default.
    pub(crate) fn parse_record(&self, record: &StringRecord) -> Result<Book, RowError> {
        let cell = |idx: usize| record.get(idx).unwrap_or_default();

        let rating = match self.rating.map(cell) {
            Some(raw) => parse_rating(raw)?,
            None => LEGACY_RATING,
        };

        Ok(Book {
            date: cell(self.date).to_string(),
            title: cell(self.title).to_string(),
            rating,
        })
    }
}

/// Parse a rating cell. Empty cells get the legacy default, and integral
/// floats such as `4.0` are accepted because spreadsheet tools like to write
/// them.
fn parse_rating(raw: &str) -> Result<u8, RowError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(LEGACY_RATING);
    }

    let value = trimmed.parse::<u8>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(value))
            .map(|value| value as u8)
    });

    match value {
        Some(rating) if (MIN_RATING..=MAX_RATING).contains(&rating) => Ok(rating),
        _ => Err(RowError::InvalidRating(trimmed.to_string())),
    }
}
