//! Persisted shapes and store key formats.
//!
//! Key formats are shared with pages already in the wild and must not change.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

pub const PROGRESS_KEY_PREFIX: &str = "ai4fairedu_progress_";
pub const LEGACY_PROGRESS_KEY_PREFIX: &str = "micro_units_progress_";
const LEGACY_UNIT_PREFIX: &str = "unit_";
pub const NOTES_KEY: &str = "learning_notes";
pub const ANONYMOUS_USER: &str = "anonymous";
pub const DEFAULT_MATERIAL: &str = "default";

/// `ai4fairedu_progress_<user>`; absent or blank users share the anonymous key.
pub fn progress_key(user_id: Option<&str>) -> String {
    let user = user_id
        .map(str::trim)
        .filter(|user| !user.is_empty())
        .unwrap_or(ANONYMOUS_USER);
    format!("{PROGRESS_KEY_PREFIX}{user}")
}

pub fn legacy_progress_key(material_id: &str) -> String {
    format!("{LEGACY_PROGRESS_KEY_PREFIX}{material_id}")
}

/// Entry name of a unit inside the legacy mapping, by zero-based document index.
pub fn legacy_unit_key(document_index: usize) -> String {
    format!("{LEGACY_UNIT_PREFIX}{document_index}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesScope {
    /// One notes slot for every material.
    Shared,
    PerMaterial,
}

pub fn notes_key(scope: &NotesScope, material_id: &str) -> String {
    match scope {
        NotesScope::Shared => NOTES_KEY.to_string(),
        NotesScope::PerMaterial => format!("{NOTES_KEY}_{material_id}"),
    }
}

/// Last path segment of a page location, or `"default"` when there is none.
///
/// Accepts absolute URLs as well as bare paths such as `/learning/42`.
pub fn material_id_from_location(location: &str) -> String {
    let parsed = Url::parse(location).or_else(|_| {
        Url::parse("http://localhost/").and_then(|base| base.join(location))
    });
    let Ok(url) = parsed else {
        return DEFAULT_MATERIAL.to_string();
    };
    url.path()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_MATERIAL)
        .to_string()
}

/// One persisted completion entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub completed: bool,
    #[serde(default)]
    pub timestamp: String,
}

/// Per-user mapping `unitId -> {completed, timestamp}`.
///
/// Entries are kept as raw JSON so unrelated records survive a rewrite untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressMap {
    entries: Map<String, Value>,
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses stored JSON. Anything other than a JSON object is rejected.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: Map<String, Value> = serde_json::from_str(raw)?;
        Ok(Self { entries })
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.entries.clone()).to_string()
    }

    /// Reads an entry leniently: only `completed` must be a boolean, a
    /// missing or non-string timestamp reads as its JSON text or empty.
    pub fn record(&self, unit_id: &str) -> Option<ProgressRecord> {
        let entry = self.entries.get(unit_id)?;
        let completed = entry.get("completed").and_then(Value::as_bool)?;
        let timestamp = match entry.get("timestamp") {
            Some(Value::String(text)) => text.clone(),
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        Some(ProgressRecord {
            completed,
            timestamp,
        })
    }

    pub fn is_completed(&self, unit_id: &str) -> bool {
        self.entries
            .get(unit_id)
            .and_then(|entry| entry.get("completed"))
            .and_then(Value::as_bool)
            == Some(true)
    }

    /// Unit ids whose record says `completed: true`.
    pub fn completed_ids(&self) -> Vec<String> {
        self.entries
            .keys()
            .filter(|unit_id| self.is_completed(unit_id))
            .cloned()
            .collect()
    }

    pub fn set(&mut self, unit_id: &str, record: &ProgressRecord) {
        let value = serde_json::json!({
            "completed": record.completed,
            "timestamp": record.timestamp,
        });
        self.entries.insert(unit_id.to_string(), value);
    }

    pub fn remove(&mut self, unit_id: &str) -> bool {
        self.entries.remove(unit_id).is_some()
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.entries.contains_key(unit_id)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Older per-material format: `"unit_<document index>" -> true`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegacyProgress {
    completed: Vec<usize>,
}

impl LegacyProgress {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: Map<String, Value> = serde_json::from_str(raw)?;
        let mut completed: Vec<usize> = entries
            .iter()
            .filter(|(_, value)| value.as_bool() == Some(true))
            .filter_map(|(key, _)| key.strip_prefix(LEGACY_UNIT_PREFIX)?.parse().ok())
            .collect();
        completed.sort_unstable();
        completed.dedup();
        Ok(Self { completed })
    }

    pub fn is_completed(&self, document_index: usize) -> bool {
        self.completed.binary_search(&document_index).is_ok()
    }

    pub fn completed_indices(&self) -> &[usize] {
        &self.completed
    }

    /// Drops the unit's entry from a stored legacy mapping, leaving every
    /// other entry as it was. Returns `None` when the entry was not there.
    pub fn forget_unit(raw: &str, document_index: usize) -> Result<Option<String>, serde_json::Error> {
        let mut entries: Map<String, Value> = serde_json::from_str(raw)?;
        if entries.remove(&legacy_unit_key(document_index)).is_none() {
            return Ok(None);
        }
        Ok(Some(Value::Object(entries).to_string()))
    }
}
