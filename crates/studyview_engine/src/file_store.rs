use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use studyview_logging::study_warn;
use tempfile::NamedTempFile;

use crate::{KeyValueStore, StoreError};

pub const STORE_FILENAME: &str = "studyview_store.json";
const CORRUPT_BACKUP_EXTENSION: &str = "bak";

/// Key-value store backed by one JSON object file.
///
/// Every write replaces the file atomically (temp file then rename), so a
/// crash leaves either the old or the new content on disk. A file that does
/// not parse is moved to `studyview_store.json.bak` and the store starts over
/// empty.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store in `dir`, creating the directory if needed. Fails when
    /// `dir` is not a writable directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let unusable = |err: io::Error| StoreError::Directory(format!("{}: {}", dir.display(), err));
        fs::create_dir_all(&dir).map_err(unusable)?;
        tempfile::tempfile_in(&dir).map_err(unusable)?;

        let store = Self {
            dir,
            write_lock: Mutex::new(()),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILENAME)
    }

    /// Where an unreadable store file is kept for inspection.
    pub fn backup_path(&self) -> PathBuf {
        self.path().with_extension(format!("json.{CORRUPT_BACKUP_EXTENSION}"))
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(parse_err) => {
                let backup = self.backup_path();
                fs::rename(&path, &backup).map_err(|err| {
                    StoreError::Corrupt(format!("{parse_err}; could not move aside: {err}"))
                })?;
                study_warn!(
                    "Store file {} was corrupt ({}); moved to {}, starting empty",
                    path.display(),
                    parse_err,
                    backup.display()
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(entries).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(self.path()).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn modify(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), StoreError> {
        let _guard = self.lock()?;
        let mut entries = self.load()?;
        if change(&mut entries) {
            self.write(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock()?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|entries| entries.remove(key).is_some())
    }
}
