//! Binary entry point that glues the CSV-backed record store to the TUI: set
//! up logging, load the table once (a corrupt file stops here with a readable
//! error), then drive the Ratatui event loop until the user exits.
use anyhow::Context;
use reading_log::{logging, run_app, App, BookList, Config, RecordStore};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::default();
    if let Some(log_file) = &config.log_file {
        logging::init(log_file)?;
    }

    let store = RecordStore::new(&config.data_file);
    let list = BookList::load(&store)
        .with_context(|| format!("failed to load {}", config.data_file.display()))?;
    info!(path = %config.data_file.display(), count = list.count(), "reading log started");

    let mut app = App::new(store, list);
    run_app(&mut app)
}
