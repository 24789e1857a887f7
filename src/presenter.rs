//! List presenter: the sorted view of stored records plus the transient
//! deletion marks the user toggles on it.
//!
//! Rows are identified by position: the cursor by position in the sorted
//! list, a deletion by position in the backing file. Marks are wiped on every
//! reload, so a stale index can never point at a different record.

use std::collections::HashSet;

use tracing::{error, info};

use crate::feedback::Feedback;
use crate::models::Book;
use crate::store::{RecordStore, StoreError};

/// Shown instead of the table when nothing has been recorded.
pub const EMPTY_NOTICE: &str = "No books recorded yet. Add one from the panel on the left!";
/// Warning shown when delete is confirmed with no rows marked.
pub const NOTHING_MARKED: &str = "Select at least one book to delete.";

/// One table row: the record, where it sits in the backing file, and its
/// ephemeral deletion mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub book: Book,
    pub position: usize,
    pub marked: bool,
}

/// Sorted rows, the cursor, and the marks. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct BookList {
    rows: Vec<ListRow>,
    selected: usize,
}

impl BookList {
    /// Wrap records given in file order. Rows are sorted newest first by
    /// comparing the stored date text: ISO dates order correctly, anything
    /// else orders by its characters. Ties keep file order.
    pub fn new(books: Vec<Book>) -> Self {
        let mut rows: Vec<ListRow> = books
            .into_iter()
            .enumerate()
            .map(|(position, book)| ListRow {
                book,
                position,
                marked: false,
            })
            .collect();
        rows.sort_by(|a, b| b.book.date.cmp(&a.book.date));
        Self { rows, selected: 0 }
    }

    pub fn load(store: &RecordStore) -> Result<Self, StoreError> {
        Ok(Self::new(store.load()?))
    }

    /// Re-read the store. The cursor stays where it was when possible; all
    /// marks are cleared.
    pub fn reload(&mut self, store: &RecordStore) -> Result<(), StoreError> {
        let selected = self.selected;
        *self = Self::load(store)?;
        self.selected = selected;
        self.ensure_in_bounds();
        Ok(())
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of records currently stored.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn count_label(&self) -> String {
        format!("Total books read: {}", self.count())
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> Option<&ListRow> {
        self.rows.get(self.selected)
    }

    pub fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let len = self.rows.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    /// Flip the mark on the row under the cursor.
    pub fn toggle_current(&mut self) {
        self.toggle(self.selected);
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(row) = self.rows.get_mut(index) {
            row.marked = !row.marked;
        }
    }

    pub fn marked_count(&self) -> usize {
        self.rows.iter().filter(|row| row.marked).count()
    }

    pub fn clear_marks(&mut self) {
        for row in &mut self.rows {
            row.marked = false;
        }
    }

    /// Rewrite the store without the marked rows, then reload. Surviving
    /// records keep their order in the file. With nothing marked the store is
    /// left alone and a warning comes back. A failed write still reloads, so
    /// the list never shows anything but what is on disk.
    pub fn confirm_delete(&mut self, store: &RecordStore) -> Feedback {
        let marked: HashSet<usize> = self
            .rows
            .iter()
            .filter(|row| row.marked)
            .map(|row| row.position)
            .collect();
        if marked.is_empty() {
            return Feedback::warning(NOTHING_MARKED);
        }

        let written = store.load().and_then(|books| {
            let keep: Vec<Book> = books
                .into_iter()
                .enumerate()
                .filter(|(position, _)| !marked.contains(position))
                .map(|(_, book)| book)
                .collect();
            store.replace(&keep)
        });
        if let Err(err) = written {
            error!(error = %err, "failed to delete records");
            return self.reload_after_failure(store, format!("Could not delete: {err}"));
        }
        let removed = marked.len();
        info!(removed, "deleted records");

        if let Err(err) = self.reload(store) {
            error!(error = %err, "failed to reload after delete");
            return Feedback::error(format!("Deleted, but reloading failed: {err}"));
        }

        if removed == 1 {
            Feedback::success("Deleted 1 book.")
        } else {
            Feedback::success(format!("Deleted {removed} books."))
        }
    }

    /// Re-read the store after a failed action and report both problems when
    /// the reload fails too.
    pub fn reload_after_failure(&mut self, store: &RecordStore, message: String) -> Feedback {
        match self.reload(store) {
            Ok(()) => Feedback::error(message),
            Err(err) => {
                error!(error = %err, "failed to reload after error");
                Feedback::error(format!("{message} (reloading also failed: {err})"))
            }
        }
    }

    fn ensure_in_bounds(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackKind;
    use tempfile::{tempdir, TempDir};

    fn seeded_store(books: &[Book]) -> (TempDir, RecordStore) {
        let dir = tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("books.csv"));
        store.replace(books).unwrap();
        (dir, store)
    }

    fn dates(list: &BookList) -> Vec<&str> {
        list.rows().iter().map(|row| row.book.date.as_str()).collect()
    }

    #[test]
    fn sorts_dates_descending_as_text() {
        let list = BookList::new(vec![
            Book::new("2024-01-05", "A", 3),
            Book::new("2024-01-20", "B", 3),
            Book::new("2023-12-31", "C", 3),
        ]);
        assert_eq!(dates(&list), vec!["2024-01-20", "2024-01-05", "2023-12-31"]);
    }

    #[test]
    fn non_iso_dates_sort_by_characters() {
        let list = BookList::new(vec![
            Book::new("9/1/2023", "A", 3),
            Book::new("10/1/2023", "B", 3),
        ]);
        assert_eq!(dates(&list), vec!["9/1/2023", "10/1/2023"]);
    }

    #[test]
    fn equal_dates_keep_file_order() {
        let list = BookList::new(vec![
            Book::new("2024-01-01", "First", 3),
            Book::new("2024-01-01", "Second", 3),
        ]);
        assert_eq!(list.rows()[0].book.title, "First");
        assert_eq!(list.rows()[1].book.title, "Second");
    }

    #[test]
    fn count_label_reads_total() {
        let list = BookList::new(vec![Book::new("2024-01-01", "A", 3)]);
        assert_eq!(list.count_label(), "Total books read: 1");
        assert_eq!(BookList::default().count(), 0);
    }

    #[test]
    fn deleting_one_marked_row_keeps_the_others() {
        let (_dir, store) = seeded_store(&[
            Book::new("2024-01-01", "Keep A", 3),
            Book::new("2024-02-01", "Drop", 2),
            Book::new("2024-03-01", "Keep B", 5),
        ]);
        let mut list = BookList::load(&store).unwrap();
        // Sorted: Keep B, Drop, Keep A.
        list.toggle(1);

        let feedback = list.confirm_delete(&store);

        assert_eq!(feedback, Feedback::success("Deleted 1 book."));
        let titles: Vec<_> = list.rows().iter().map(|r| r.book.title.clone()).collect();
        assert_eq!(titles, vec!["Keep B", "Keep A"]);
        let stored = store.load().unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|book| book.title != "Drop"));
        assert_eq!(list.marked_count(), 0);
    }

    #[test]
    fn deleting_keeps_file_order_of_survivors() {
        let (_dir, store) = seeded_store(&[
            Book::new("2024-01-01", "A", 3),
            Book::new("2024-01-02", "B", 3),
            Book::new("2024-01-03", "C", 3),
        ]);
        let mut list = BookList::load(&store).unwrap();
        // Sorted: C, B, A.
        list.toggle(1);

        assert!(list.confirm_delete(&store).is_success());

        let stored: Vec<_> = store.load().unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(stored, vec!["A", "C"]);
    }

    #[test]
    fn failed_delete_reloads_and_clears_marks() {
        let (_dir, store) = seeded_store(&[
            Book::new("2024-01-01", "A", 3),
            Book::new("2024-01-02", "B", 3),
        ]);
        let mut list = BookList::load(&store).unwrap();
        list.toggle(0);
        // Someone else adds a row, then writes start failing.
        store.append(Book::new("2024-01-03", "C", 3)).unwrap();
        std::fs::create_dir(store.staging_path()).unwrap();

        let feedback = list.confirm_delete(&store);

        assert_eq!(feedback.kind, FeedbackKind::Error);
        assert!(feedback.text.starts_with("Could not delete:"));
        assert_eq!(list.marked_count(), 0);
        assert_eq!(dates(&list), vec!["2024-01-03", "2024-01-02", "2024-01-01"]);
    }

    #[test]
    fn failed_reload_is_folded_into_the_message() {
        let (_dir, store) = seeded_store(&[Book::new("2024-01-01", "A", 3)]);
        let mut list = BookList::load(&store).unwrap();
        std::fs::write(store.path(), "title\nno date column\n").unwrap();

        let feedback = list.reload_after_failure(&store, "Could not save".to_string());

        assert_eq!(feedback.kind, FeedbackKind::Error);
        assert!(feedback.text.starts_with("Could not save (reloading also failed:"));
    }

    #[test]
    fn confirming_with_nothing_marked_is_a_no_op() {
        let (_dir, store) = seeded_store(&[
            Book::new("2024-01-01", "A", 3),
            Book::new("2024-02-01", "B", 3),
        ]);
        let mut list = BookList::load(&store).unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let feedback = list.confirm_delete(&store);

        assert_eq!(feedback.kind, FeedbackKind::Warning);
        assert_eq!(list.count(), 2);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn toggling_twice_unmarks() {
        let mut list = BookList::new(vec![Book::new("2024-01-01", "A", 3)]);
        list.toggle_current();
        assert_eq!(list.marked_count(), 1);
        list.toggle_current();
        assert_eq!(list.marked_count(), 0);
        list.toggle(7);
        assert_eq!(list.marked_count(), 0);
    }

    #[test]
    fn deleting_everything_leaves_empty_list() {
        let (_dir, store) = seeded_store(&[
            Book::new("2024-01-01", "A", 3),
            Book::new("2024-02-01", "B", 3),
        ]);
        let mut list = BookList::load(&store).unwrap();
        list.select_last();
        list.toggle(0);
        list.toggle(1);

        assert!(list.confirm_delete(&store).is_success());
        assert!(list.is_empty());
        assert_eq!(list.selected(), 0);
    }

    #[test]
    fn cursor_movement_is_clamped() {
        let mut list = BookList::new(vec![
            Book::new("2024-01-01", "A", 3),
            Book::new("2024-01-02", "B", 3),
            Book::new("2024-01-03", "C", 3),
        ]);
        list.move_selection(-5);
        assert_eq!(list.selected(), 0);
        list.move_selection(10);
        assert_eq!(list.selected(), 2);
        list.select_first();
        assert_eq!(list.current().unwrap().book.title, "C");
    }
}
