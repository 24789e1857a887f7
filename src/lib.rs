//! Core library surface for the reading log.
//!
//! The record store, the form controller and the list presenter carry all of
//! the behavior and know nothing about the terminal; the `ui` module only
//! routes key presses to them and draws what they hand back, so every
//! load, mutate, store and reload cycle can be tested without a terminal.
pub mod config;
pub mod entry;
pub mod feedback;
pub mod logging;
pub mod models;
pub mod presenter;
pub mod store;
pub mod ui;

/// Configuration resolved once at startup.
pub use config::Config;

/// Form controller entry point and the draft it consumes.
pub use entry::{submit, EntryDraft};

/// Inline messages produced by user actions.
pub use feedback::{Feedback, FeedbackKind};

/// The only domain type.
pub use models::Book;

/// Sorted, markable view of the stored records.
pub use presenter::BookList;

/// Whole-file CSV persistence.
pub use store::{RecordStore, StoreError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
