//! Typed access to the store keys the learning view owns.
//!
//! Reads are fail-soft: a store error or unparsable value is logged and
//! treated as "nothing stored".

use studyview_core::{
    legacy_progress_key, notes_key, progress_key, LegacyProgress, NotesScope, ProgressMap,
    ProgressRecord,
};
use studyview_logging::{study_debug, study_warn};

use crate::{KeyValueStore, StoreError};

/// Per-user completion mapping under `ai4fairedu_progress_<user>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRepository {
    key: String,
}

impl ProgressRepository {
    pub fn for_user(user_id: Option<&str>) -> Self {
        Self {
            key: progress_key(user_id),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored mapping, or empty when absent or unreadable.
    pub fn load(&self, store: &dyn KeyValueStore) -> ProgressMap {
        self.load_checked(store).unwrap_or_default()
    }

    /// Like [`Self::load`] but distinguishes "could not read" (`None`) from
    /// "nothing stored" (empty mapping).
    pub fn load_checked(&self, store: &dyn KeyValueStore) -> Option<ProgressMap> {
        let raw = match store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Some(ProgressMap::new()),
            Err(err) => {
                study_warn!("Failed to read progress {}: {}", self.key, err);
                return None;
            }
        };
        match ProgressMap::from_json(&raw) {
            Ok(map) => Some(map),
            Err(err) => {
                study_warn!("Ignoring malformed progress under {}: {}", self.key, err);
                None
            }
        }
    }

    /// Read-modify-write of the whole mapping: sets the unit's record when
    /// `completed`, removes it otherwise.
    pub fn record(
        &self,
        store: &dyn KeyValueStore,
        unit_id: &str,
        completed: bool,
        timestamp: String,
    ) -> Result<(), StoreError> {
        let mut map = self.load(store);
        if completed {
            map.set(unit_id, &ProgressRecord { completed, timestamp });
        } else {
            map.remove(unit_id);
        }
        study_debug!("Writing {} progress entries to {}", map.len(), self.key);
        store.set(&self.key, &map.to_json())
    }

    /// Writes a fully prepared mapping.
    pub fn replace(&self, store: &dyn KeyValueStore, map: &ProgressMap) -> Result<(), StoreError> {
        store.set(&self.key, &map.to_json())
    }
}

/// Per-material `micro_units_progress_<material>` mapping. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyProgressRepository {
    key: String,
}

impl LegacyProgressRepository {
    pub fn for_material(material_id: &str) -> Self {
        Self {
            key: legacy_progress_key(material_id),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self, store: &dyn KeyValueStore) -> LegacyProgress {
        let raw = match store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LegacyProgress::default(),
            Err(err) => {
                study_warn!("Failed to read legacy progress {}: {}", self.key, err);
                return LegacyProgress::default();
            }
        };
        LegacyProgress::from_json(&raw).unwrap_or_else(|err| {
            study_warn!("Ignoring malformed legacy progress under {}: {}", self.key, err);
            LegacyProgress::default()
        })
    }

    /// Removes the unit's `unit_<index>` entry so a later import cannot
    /// resurrect it. Absent keys and unparsable mappings are left alone.
    pub fn forget(&self, store: &dyn KeyValueStore, document_index: usize) -> Result<(), StoreError> {
        let Some(raw) = store.get(&self.key)? else {
            return Ok(());
        };
        match LegacyProgress::forget_unit(&raw, document_index) {
            Ok(Some(updated)) => {
                study_debug!("Dropping unit_{} from {}", document_index, self.key);
                store.set(&self.key, &updated)
            }
            Ok(None) => Ok(()),
            Err(err) => {
                study_warn!("Leaving malformed legacy progress {} untouched: {}", self.key, err);
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesRepository {
    key: String,
}

impl NotesRepository {
    pub fn new(scope: &NotesScope, material_id: &str) -> Self {
        Self {
            key: notes_key(scope, material_id),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Saved notes; empty strings count as nothing saved.
    pub fn load(&self, store: &dyn KeyValueStore) -> Option<String> {
        match store.get(&self.key) {
            Ok(notes) => notes.filter(|text| !text.is_empty()),
            Err(err) => {
                study_warn!("Failed to read notes {}: {}", self.key, err);
                None
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore, text: &str) -> Result<(), StoreError> {
        store.set(&self.key, text)
    }

    pub fn clear(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        store.remove(&self.key)
    }
}
