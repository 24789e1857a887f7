use std::fs;

use chrono::NaiveDate;
use reading_log::models::star_glyphs;
use reading_log::presenter::NOTHING_MARKED;
use reading_log::{submit, Book, BookList, EntryDraft, Feedback, FeedbackKind, RecordStore};
use tempfile::{tempdir, TempDir};

fn scratch_store() -> (TempDir, RecordStore) {
    let dir = tempdir().unwrap();
    let store = RecordStore::new(dir.path().join("books.csv"));
    (dir, store)
}

fn draft(date: &str, title: &str, rating: u8) -> EntryDraft {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    EntryDraft::new(date, title, rating)
}

#[test]
fn submit_then_reload_shows_one_five_star_row() {
    let (_dir, store) = scratch_store();
    let mut list = BookList::load(&store).unwrap();
    assert!(list.is_empty());

    let feedback = submit(&store, &draft("2024-03-01", "Dune", 5));
    assert_eq!(feedback.kind, FeedbackKind::Success);
    list.reload(&store).unwrap();

    assert_eq!(list.count(), 1);
    assert_eq!(list.count_label(), "Total books read: 1");
    let row = &list.rows()[0];
    assert_eq!(row.book, Book::new("2024-03-01", "Dune", 5));
    assert_eq!(row.book.stars(), "★★★★★");
    assert!(!row.marked);
}

#[test]
fn submitted_text_is_stored_exactly() {
    let (_dir, store) = scratch_store();
    let titles = ["Le Petit Prince", "채식주의자", "War and Peace, Vol. 2", "\"Quoted\""];

    for title in titles {
        assert!(submit(&store, &draft("2024-01-01", title, 4)).is_success());
    }

    let stored: Vec<String> = store.load().unwrap().into_iter().map(|b| b.title).collect();
    assert_eq!(stored, titles);
}

#[test]
fn empty_title_changes_nothing() {
    let (_dir, store) = scratch_store();
    submit(&store, &draft("2024-01-01", "First", 3));
    let before = store.load().unwrap().len();

    let feedback = submit(&store, &draft("2024-01-02", "", 3));

    assert_eq!(feedback.kind, FeedbackKind::Warning);
    assert_eq!(store.load().unwrap().len(), before);
}

#[test]
fn minimal_schema_rows_read_as_three_stars() {
    let (_dir, store) = scratch_store();
    fs::write(
        store.path(),
        "date,title\n2023-04-01,Old One\n2023-05-01,Old Two\n",
    )
    .unwrap();

    let list = BookList::load(&store).unwrap();

    assert_eq!(list.count(), 2);
    assert!(list.rows().iter().all(|row| row.book.rating == 3));
    assert_eq!(list.rows()[0].book.stars(), star_glyphs(3));
}

#[test]
fn original_application_file_loads() {
    let (_dir, store) = scratch_store();
    fs::write(
        store.path(),
        "날짜,책 제목,별점\n2024-01-05,데미안,4\n2024-01-20,노인과 바다,5\n",
    )
    .unwrap();

    let list = BookList::load(&store).unwrap();

    let titles: Vec<_> = list.rows().iter().map(|r| r.book.title.as_str()).collect();
    assert_eq!(titles, vec!["노인과 바다", "데미안"]);
}

#[test]
fn list_is_sorted_by_date_text_descending() {
    let (_dir, store) = scratch_store();
    for date in ["2024-01-05", "2024-01-20", "2023-12-31"] {
        submit(&store, &draft(date, date, 3));
    }

    let list = BookList::load(&store).unwrap();
    let dates: Vec<_> = list.rows().iter().map(|r| r.book.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-20", "2024-01-05", "2023-12-31"]);

    // Storage keeps arrival order.
    let stored: Vec<_> = store.load().unwrap().into_iter().map(|b| b.date).collect();
    assert_eq!(stored, vec!["2024-01-05", "2024-01-20", "2023-12-31"]);
}

#[test]
fn deleting_one_of_three_rows() {
    let (_dir, store) = scratch_store();
    submit(&store, &draft("2024-01-01", "A", 1));
    submit(&store, &draft("2024-01-02", "B", 2));
    submit(&store, &draft("2024-01-03", "C", 3));
    let mut list = BookList::load(&store).unwrap();

    // Sorted newest first: C, B, A.
    list.toggle(1);
    let feedback = list.confirm_delete(&store);

    assert!(feedback.is_success());
    let reloaded = BookList::load(&store).unwrap();
    let titles: Vec<_> = reloaded.rows().iter().map(|r| r.book.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A"]);
    assert_eq!(reloaded.rows(), list.rows());
}

#[test]
fn deleting_with_no_marks_keeps_everything() {
    let (_dir, store) = scratch_store();
    submit(&store, &draft("2024-01-01", "A", 1));
    submit(&store, &draft("2024-01-02", "B", 2));
    let mut list = BookList::load(&store).unwrap();

    let feedback = list.confirm_delete(&store);

    assert_eq!(feedback, Feedback::warning(NOTHING_MARKED));
    assert_eq!(store.load().unwrap().len(), 2);
    assert_eq!(list.count(), 2);
}

#[test]
fn corrupt_rating_is_an_error_not_a_panic() {
    let (_dir, store) = scratch_store();
    fs::write(store.path(), "date,title,rating\n2024-01-01,Bad,lots\n").unwrap();

    let err = BookList::load(&store).unwrap_err();
    assert!(err.to_string().contains("rating 'lots'"));
}
