use std::fmt;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use studyview_core::{material_id_from_location, NotesScope, DEFAULT_MATERIAL};

/// Produces the timestamp stored with progress records.
pub type TimestampFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Current UTC time as `2024-05-01T10:00:00.000Z`.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Clone)]
pub struct SessionConfig {
    /// Absent users share the anonymous progress key.
    pub user_id: Option<String>,
    pub material_id: String,
    pub notes_scope: NotesScope,
    /// Import `micro_units_progress_<material>` entries on initialize.
    pub import_legacy_progress: bool,
    /// The host can synthesize speech; read-aloud controls stay hidden otherwise.
    pub speech_supported: bool,
    pub timestamp_utc: TimestampFn,
}

impl SessionConfig {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id,
            material_id: DEFAULT_MATERIAL.to_string(),
            notes_scope: NotesScope::PerMaterial,
            import_legacy_progress: false,
            speech_supported: false,
            timestamp_utc: Arc::new(utc_timestamp),
        }
    }

    /// Derives the material id from the last path segment of `location`.
    pub fn for_location(user_id: Option<String>, location: &str) -> Self {
        Self {
            material_id: material_id_from_location(location),
            ..Self::new(user_id)
        }
    }

    pub fn with_timestamps(mut self, timestamp_utc: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.timestamp_utc = Arc::new(timestamp_utc);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("user_id", &self.user_id)
            .field("material_id", &self.material_id)
            .field("notes_scope", &self.notes_scope)
            .field("import_legacy_progress", &self.import_legacy_progress)
            .field("speech_supported", &self.speech_supported)
            .finish_non_exhaustive()
    }
}
