//! Whole-state load/save of [`AppData`] through a [`KeyValueStore`].
//!
//! The blob is a JSON object `{schemaVersion, tasks, completions}`. Blobs
//! written before `schemaVersion` existed have the same shape minus that
//! field and are read as version 1.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::{AppData, CompletionMap, Task};

/// Well-known key the application state lives under
pub const STORAGE_KEY: &str = "task-manager-data-v1";

/// Current blob layout version
pub const SCHEMA_VERSION: u32 = 1;

/// Key a blob that failed to parse is copied to before it gets overwritten
pub fn corrupt_backup_key() -> String {
    format!("{}.corrupt", STORAGE_KEY)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredRef<'a> {
    schema_version: u32,
    tasks: &'a [Task],
    completions: &'a CompletionMap,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Stored {
    #[serde(default)]
    schema_version: Option<u32>,
    tasks: Vec<Task>,
    #[serde(default)]
    completions: CompletionMap,
}

/// Result of reading the stored state
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(AppData),
    /// Nothing stored under the key
    Missing,
    /// Something is stored but it is not a valid blob. The raw value has
    /// been copied to [`corrupt_backup_key`].
    Malformed(String),
    /// Something may be stored but could neither be read nor backed up.
    /// The caller must not overwrite it.
    Unreadable(String),
}

impl LoadOutcome {
    pub fn into_data(self) -> Option<AppData> {
        match self {
            LoadOutcome::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Serialize the full state in the current layout.
pub fn encode(data: &AppData) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StoredRef {
        schema_version: SCHEMA_VERSION,
        tasks: &data.tasks,
        completions: &data.completions,
    })
}

/// Parse a stored blob, versioned or legacy.
pub fn decode(raw: &str) -> Result<AppData, serde_json::Error> {
    let stored: Stored = serde_json::from_str(raw)?;
    let version = stored.schema_version.unwrap_or(1);
    if version > SCHEMA_VERSION {
        warn!(
            version,
            supported = SCHEMA_VERSION,
            "stored data was written by a newer version; reading it as version {}",
            SCHEMA_VERSION
        );
    }
    Ok(AppData {
        tasks: stored.tasks,
        completions: stored.completions,
    })
}

/// Read the state from `store`.
///
/// Never fails: unreadable storage and unparseable blobs both come back as
/// an outcome the caller can seed from. A malformed or unreadable value is
/// copied to [`corrupt_backup_key`] first so the next save does not destroy
/// it. When even that copy fails the outcome is [`LoadOutcome::Unreadable`].
pub fn load<S: KeyValueStore + ?Sized>(store: &mut S) -> LoadOutcome {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key = STORAGE_KEY, "no stored data");
            return LoadOutcome::Missing;
        }
        Err(e) => {
            warn!(key = STORAGE_KEY, error = %e, "could not read stored data");
            return match store.copy(STORAGE_KEY, &corrupt_backup_key()) {
                Ok(_) => LoadOutcome::Malformed(e.to_string()),
                Err(backup_err) => {
                    warn!(error = %backup_err, "could not back up unreadable data");
                    LoadOutcome::Unreadable(e.to_string())
                }
            };
        }
    };

    match decode(&raw) {
        Ok(data) => {
            debug!(
                key = STORAGE_KEY,
                tasks = data.tasks.len(),
                "loaded stored data"
            );
            LoadOutcome::Loaded(data)
        }
        Err(e) => {
            warn!(key = STORAGE_KEY, error = %e, "stored data is malformed; starting fresh");
            if let Err(backup_err) = store.set(&corrupt_backup_key(), &raw) {
                warn!(error = %backup_err, "could not back up malformed data");
            }
            LoadOutcome::Malformed(e.to_string())
        }
    }
}

/// Overwrite the stored state with `data`.
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, data: &AppData) -> Result<(), StorageError> {
    let blob = encode(data)?;
    store.set(STORAGE_KEY, &blob)?;
    debug!(key = STORAGE_KEY, bytes = blob.len(), "saved data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::{FileStore, MemoryStore};

    #[test]
    fn load_missing_key() {
        let mut store = MemoryStore::new();
        assert!(matches!(load(&mut store), LoadOutcome::Missing));
    }

    #[test]
    fn save_writes_schema_version() {
        let mut store = MemoryStore::new();
        save(&mut store, &AppData::default()).unwrap();
        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["tasks"], serde_json::json!([]));
        assert_eq!(value["completions"], serde_json::json!({}));
    }

    #[test]
    fn legacy_blob_without_version_loads() {
        let raw = r#"{
            "tasks": [{"id":"a","title":"Walk","createdAt":"2024-01-01T09:00:00.000Z"}],
            "completions": {"a": {"2024-01-02": true, "2024-01-03": false}}
        }"#;
        let data = decode(raw).unwrap();
        assert_eq!(data.tasks.len(), 1);
        assert!(data.completions.is_completed("a", "2024-01-02"));
        assert!(!data.completions.is_completed("a", "2024-01-03"));
    }

    #[test]
    fn newer_version_still_reads_known_shape() {
        let raw = r#"{"schemaVersion": 7, "tasks": [], "completions": {}}"#;
        assert_eq!(decode(raw).unwrap(), AppData::default());
    }

    #[test]
    fn malformed_blob_is_backed_up() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        assert!(matches!(load(&mut store), LoadOutcome::Malformed(_)));
        assert_eq!(
            store.get(&corrupt_backup_key()).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn non_utf8_file_is_backed_up_byte_for_byte() {
        let dir = tempfile::TempDir::new().unwrap();
        let raw: &[u8] = b"{\"tasks\":[{\"id\":\"a\",\"title\":\"W\xffalk\"}]}";
        let path = dir.path().join(format!("{}.json", STORAGE_KEY));
        std::fs::write(&path, raw).unwrap();

        let mut store = FileStore::new(dir.path());
        assert!(matches!(load(&mut store), LoadOutcome::Malformed(_)));
        let backup = dir.path().join(format!("{}.json", corrupt_backup_key()));
        assert_eq!(std::fs::read(backup).unwrap(), raw);
    }

    #[test]
    fn unreadable_without_backup_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(format!("{}.json", STORAGE_KEY))).unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(matches!(load(&mut store), LoadOutcome::Unreadable(_)));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        for raw in ["null", "[]", r#"{"tasks": 3}"#, r#"{"completions": {}}"#] {
            let mut store = MemoryStore::new();
            store.set(STORAGE_KEY, raw).unwrap();
            assert!(
                matches!(load(&mut store), LoadOutcome::Malformed(_)),
                "expected malformed for {}",
                raw
            );
        }
    }

    #[test]
    fn save_surfaces_quota_error() {
        let mut store = MemoryStore::with_quota(4);
        let err = save(&mut store, &AppData::default()).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    }
}
