//! Ratatui front-end: the input panel, the book table and the status footer.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
