//! Persistence module split across logical submodules.

mod error;
mod records;
mod schema;

pub use error::StoreError;
pub use records::RecordStore;
pub use schema::COLUMNS;
