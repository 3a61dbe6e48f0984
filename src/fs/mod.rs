pub mod store;

use std::path::PathBuf;

pub use store::{JsonFileStore, TaskStore};
#[cfg(test)]
pub use store::MemoryStore;

/// Get the application data directory
/// Linux: ~/.local/share/deadline-guardian
/// macOS: ~/Library/Application Support/deadline-guardian
/// Windows: %APPDATA%\deadline-guardian
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deadline-guardian")
}

/// Default location of the JSON database
pub fn default_database_path() -> PathBuf {
    get_data_dir().join("database.json")
}
