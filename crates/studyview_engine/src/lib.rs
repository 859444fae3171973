//! Studyview engine: key-value persistence and effect execution for the learning view.
mod config;
mod file_store;
mod repository;
mod session;
mod store;

pub use config::{utc_timestamp, SessionConfig, TimestampFn};
pub use file_store::{FileStore, STORE_FILENAME};
pub use repository::{LegacyProgressRepository, NotesRepository, ProgressRepository};
pub use session::StudySession;
pub use store::{InMemoryStore, KeyValueStore, StoreError};
