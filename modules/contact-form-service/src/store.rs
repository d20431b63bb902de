//! Whole-collection persistence for visitor records.
//!
//! Every operation loads the full collection and writes it back in one
//! piece. Stores do no locking of their own; the ledger serializes writers.

use crate::error::StoreError;
use contact_form_types::VisitorRecord;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

pub trait RecordStore: Send + Sync {
    /// Returns every record, or an empty list if nothing was stored yet.
    fn load_all(&self) -> Result<Vec<VisitorRecord>, StoreError>;

    /// Replaces the stored collection.
    fn save_all(&self, records: &[VisitorRecord]) -> Result<(), StoreError>;
}

/// Opens the store at `path`. `:memory:` gives a store that lives as long
/// as the process.
pub fn open(path: &str) -> Arc<dyn RecordStore> {
    if path == ":memory:" {
        Arc::new(MemoryStore::default())
    } else {
        Arc::new(JsonFileStore::new(path))
    }
}

/// Pretty-printed JSON array in a single file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<VisitorRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save_all(&self, records: &[VisitorRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, json)?;
        log::debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<VisitorRecord>>,
}

impl RecordStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<VisitorRecord>, StoreError> {
        Ok(self.records.lock().clone())
    }

    fn save_all(&self, records: &[VisitorRecord]) -> Result<(), StoreError> {
        *self.records.lock() = records.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, id: &str) -> VisitorRecord {
        VisitorRecord {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555".to_string(),
            message: String::new(),
            source: "form".to_string(),
            timestamp: "2025-01-01T00:00:00.000000+00:00".to_string(),
            query_method: Vec::new(),
            query_id: id.to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("submissions.json"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/submissions.json"));

        let records = vec![record("Ann", "aaaaaaaaaa"), record("Bob", "bbbbbbbbbb")];
        store.save_all(&records).unwrap();

        assert_eq!(store.load_all().unwrap(), records);
    }

    #[test]
    fn test_save_replaces_whole_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("submissions.json"));

        store
            .save_all(&[record("Ann", "aaaaaaaaaa"), record("Bob", "bbbbbbbbbb")])
            .unwrap();
        store.save_all(&[record("Cat", "cccccccccc")]).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Cat");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load_all(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_loads_legacy_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submissions.json");
        std::fs::write(
            &path,
            r#"[{"name": "Old", "email": "old@x.com", "phone": "1", "message": "hello"}]"#,
        )
        .unwrap();

        let loaded = JsonFileStore::new(&path).load_all().unwrap();
        assert_eq!(loaded[0].message, "hello");
        assert_eq!(loaded[0].source, "form");
        assert!(loaded[0].id.is_empty());
    }

    #[test]
    fn test_memory_store() {
        let store = open(":memory:");
        assert!(store.load_all().unwrap().is_empty());

        store.save_all(&[record("Ann", "aaaaaaaaaa")]).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }
}
