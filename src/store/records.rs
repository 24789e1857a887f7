use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::models::Book;

use super::error::StoreError;
use super::schema::{ColumnMap, RowError, COLUMNS};

/// Whole-file CSV persistence for reading records. Every operation reads or
/// rewrites the complete table; there is no locking, so the last writer wins.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return every stored record in file order. A missing (or zero-byte)
    /// file reads as an empty table.
    pub fn load(&self) -> Result<Vec<Book>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "backing file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|source| self.csv_error(source))?
            .clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let columns = ColumnMap::from_headers(&headers).map_err(|column| {
            StoreError::MissingColumn {
                path: self.path.clone(),
                column,
            }
        })?;
        if columns.is_legacy() {
            info!(path = %self.path.display(), "no rating column, using default for all rows");
        }

        let mut books = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|source| self.csv_error(source))?;
            let book = columns.parse_record(&record).map_err(|err| match err {
                RowError::InvalidRating(value) => StoreError::InvalidRating {
                    path: self.path.clone(),
                    line: record.position().map(|pos| pos.line()).unwrap_or_default(),
                    value,
                },
            })?;
            books.push(book);
        }

        debug!(path = %self.path.display(), count = books.len(), "loaded records");
        Ok(books)
    }

    /// Load the table, add `book` at the end and persist the result. Records
    /// keep arrival order on disk; sorting is a presentation concern.
    pub fn append(&self, book: Book) -> Result<Vec<Book>, StoreError> {
        let mut books = self.load()?;
        info!(date = %book.date, title = %book.title, rating = book.rating, "appending record");
        books.push(book);
        self.write_all(&books)?;
        Ok(books)
    }

    /// Overwrite the table with exactly `books`.
    pub fn replace(&self, books: &[Book]) -> Result<(), StoreError> {
        info!(count = books.len(), "replacing stored records");
        self.write_all(books)
    }

    /// Sibling file every write goes to before it replaces the backing file.
    pub(crate) fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Write the table to the staging file, then rename it over the backing
    /// file. A failed write leaves the previous table untouched.
    fn write_all(&self, books: &[Book]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
            }
        }

        let staging = self.staging_path();
        if let Err(err) = self.write_staged(&staging, books) {
            warn!(path = %staging.display(), error = %err, "staged write failed");
            let _ = fs::remove_file(&staging);
            return Err(err);
        }
        fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))
    }

    fn write_staged(&self, staging: &Path, books: &[Book]) -> Result<(), StoreError> {
        // Headers are written by hand so an empty table still gets them.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(staging)
            .map_err(|source| self.csv_error(source))?;
        writer
            .write_record(COLUMNS)
            .map_err(|source| self.csv_error(source))?;
        for book in books {
            writer
                .serialize(book)
                .map_err(|source| self.csv_error(source))?;
        }
        writer.flush().map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}
