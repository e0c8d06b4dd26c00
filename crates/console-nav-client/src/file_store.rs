use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use console_nav_core::PreferenceStore;
use serde::{Deserialize, Serialize};

const PREFERENCES_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("preferences mkdir failed: {0}")]
    CreateDir(std::io::Error),
    #[error("preferences encode failed: {0}")]
    Encode(serde_json::Error),
    #[error("preferences write failed: {0}")]
    Write(std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PreferencesDocument {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// Preference store persisted as a JSON document. Every write flushes the
/// whole document; a missing, corrupt or foreign-version file loads empty.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<PreferencesDocument>(&raw) {
                Ok(document) if document.version == PREFERENCES_SCHEMA_VERSION => {
                    document.entries
                }
                Ok(document) => {
                    tracing::warn!(
                        path = %path.display(),
                        version = document.version,
                        "ignoring preferences with unknown schema version"
                    );
                    BTreeMap::new()
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), error = %error, "ignoring corrupt preferences");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            entries: RefCell::new(entries),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), FileStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(FileStoreError::CreateDir)?;
        }
        let encoded = serde_json::to_string_pretty(&PreferencesDocument {
            version: PREFERENCES_SCHEMA_VERSION,
            entries: self.entries.borrow().clone(),
        })
        .map_err(FileStoreError::Encode)?;
        fs::write(&self.path, encoded).map_err(FileStoreError::Write)
    }
}

impl PreferenceStore for FilePreferenceStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let removed = self.entries.borrow_mut().remove(key);
        if removed.is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_nav_core::preferences::{KEY_CHATS, KEY_DEFAULT_COLLAPSE_SIDEBAR};

    #[test]
    fn file_store_persists_across_loads() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("nested").join("console-preferences.v1.json");
        let store = FilePreferenceStore::load(&path);
        store
            .set(KEY_DEFAULT_COLLAPSE_SIDEBAR, "true")
            .expect("write collapse");
        store.set(KEY_CHATS, "[]").expect("write chats");
        store.remove(KEY_CHATS).expect("remove chats");

        let recovered = FilePreferenceStore::load(&path);
        assert_eq!(
            recovered.get(KEY_DEFAULT_COLLAPSE_SIDEBAR).expect("get").as_deref(),
            Some("true")
        );
        assert_eq!(recovered.get(KEY_CHATS).expect("get"), None);
    }

    #[test]
    fn file_store_recovers_as_empty_on_corrupt_payload() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("console-preferences.v1.json");
        std::fs::write(&path, "not json").expect("write corrupt file");

        let recovered = FilePreferenceStore::load(&path);
        assert_eq!(recovered.get(KEY_CHATS).expect("get"), None);
    }

    #[test]
    fn file_store_ignores_unknown_schema_version() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("console-preferences.v1.json");
        std::fs::write(&path, r#"{"version":9,"entries":{"chats":"[]"}}"#)
            .expect("write future file");

        let recovered = FilePreferenceStore::load(&path);
        assert_eq!(recovered.get(KEY_CHATS).expect("get"), None);
    }
}
