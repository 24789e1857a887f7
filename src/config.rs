use std::path::PathBuf;

use directories::BaseDirs;

/// Backing file name, relative to the working directory.
pub const DATA_FILE_NAME: &str = "books.csv";
/// Folder name used beneath the user's home directory for the log file.
const LOG_DIR_NAME: &str = ".reading-log";
/// Log file name stored inside the log directory.
const LOG_FILE_NAME: &str = "reading-log.log";

/// Paths the application works with. Built once in `main` and handed to the
/// store and the logger instead of being read from globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    /// `None` disables logging.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DATA_FILE_NAME),
            log_file: default_log_path(),
        }
    }
}

impl Config {
    pub fn with_data_file(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            ..Self::default()
        }
    }
}

/// Resolve the log file inside the user's home, if there is one.
fn default_log_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new()?;
    Some(base_dirs.home_dir().join(LOG_DIR_NAME).join(LOG_FILE_NAME))
}
