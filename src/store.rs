use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::stress::StressClass;
use crate::vector::MeasurementVector;

/// Storage key under which the serialized history log lives.
pub const HISTORY_KEY: &str = "stress_history";

/// Hard upper bound on retained records; appending past it evicts the oldest.
pub const HISTORY_CAPACITY: usize = 50;

/// Durable key-value capability injected into the [`HistoryStore`]. A missing
/// key and a removed key are indistinguishable on read.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// In-memory backend: tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-per-key backend: each key maps to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// One persisted submission. Immutable once created; deletion removes the
/// whole record. `date` is the human-formatted local time of the submission
/// and doubles as search text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub inputs: MeasurementVector,
    pub result: StressClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
    pub date: String,
}

/// Owns the newest-first, capacity-bounded prediction log and is the only
/// writer of its backing key. Every mutation writes the full log through to
/// the backend before returning.
pub struct HistoryStore<S: KeyValueStore> {
    backend: S,
    records: Vec<PredictionRecord>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Load the log from the backend. Missing or malformed stored data
    /// yields an empty log; decode trouble is logged, never surfaced.
    pub fn load(backend: S) -> Self {
        let records = match backend.get(HISTORY_KEY) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<PredictionRecord>>(&raw) {
                Ok(mut records) => {
                    records.truncate(HISTORY_CAPACITY);
                    records
                }
                Err(err) => {
                    warn!(key = HISTORY_KEY, %err, "discarding malformed stored history");
                    Vec::new()
                }
            },
        };
        HistoryStore { backend, records }
    }

    /// Insert at the head, evicting the oldest records past capacity.
    pub fn append(&mut self, record: PredictionRecord) {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAPACITY);
        self.persist();
    }

    /// Remove the record at `position` in the current newest-first ordering.
    /// Out-of-range positions leave the log unchanged.
    pub fn delete_at(&mut self, position: usize) {
        if position >= self.records.len() {
            return;
        }
        self.records.remove(position);
        self.persist();
    }

    /// Empty the log and drop the stored key entirely.
    pub fn clear(&mut self) {
        self.records.clear();
        if let Err(err) = self.backend.remove(HISTORY_KEY) {
            warn!(key = HISTORY_KEY, %err, "failed to remove stored history");
        }
    }

    /// Current records, newest first.
    pub fn all(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.records) {
            Ok(raw) => {
                if let Err(err) = self.backend.set(HISTORY_KEY, &raw) {
                    warn!(key = HISTORY_KEY, %err, "failed to write history");
                }
            }
            Err(err) => warn!(key = HISTORY_KEY, %err, "failed to serialize history"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tag: usize, result: StressClass) -> PredictionRecord {
        PredictionRecord {
            inputs: MeasurementVector::zeroed(),
            result,
            advice: None,
            date: format!("2026-08-29 10:{tag:02}:00"),
        }
    }

    #[test]
    fn test_append_puts_newest_first() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.append(record(1, StressClass::Low));
        store.append(record(2, StressClass::High));
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].result, StressClass::High);
        assert_eq!(store.all()[1].result, StressClass::Low);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut store = HistoryStore::load(MemoryStore::new());
        for i in 0..52 {
            store.append(record(i, StressClass::Low));
        }
        assert_eq!(store.len(), HISTORY_CAPACITY);
        // The 52nd append (tag 51) is at the head; tags 0 and 1 are gone.
        assert_eq!(store.all()[0].date, "2026-08-29 10:51:00");
        assert!(store.all().iter().all(|r| r.date != "2026-08-29 10:00:00"));
        assert!(store.all().iter().all(|r| r.date != "2026-08-29 10:01:00"));
    }

    #[test]
    fn test_delete_at_preserves_relative_order() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.append(record(0, StressClass::Low));
        store.append(record(1, StressClass::Medium));
        store.append(record(2, StressClass::High));
        store.delete_at(1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].result, StressClass::High);
        assert_eq!(store.all()[1].result, StressClass::Low);
    }

    #[test]
    fn test_delete_at_out_of_range_is_noop() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.append(record(0, StressClass::Low));
        store.delete_at(5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_empties_log_and_backend() {
        let mut backend = MemoryStore::new();
        backend.set("unrelated", "keep me").unwrap();
        let mut store = HistoryStore::load(backend);
        store.append(record(0, StressClass::Low));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.backend.get(HISTORY_KEY), None);
        assert_eq!(store.backend.get("unrelated").as_deref(), Some("keep me"));
    }

    #[test]
    fn test_mutations_write_through() {
        let mut store = HistoryStore::load(MemoryStore::new());
        store.append(record(0, StressClass::Medium));
        let raw = store.backend.get(HISTORY_KEY).unwrap();
        let reloaded = HistoryStore::load(MemoryStore {
            entries: HashMap::from([(HISTORY_KEY.to_string(), raw)]),
        });
        assert_eq!(reloaded.all(), store.all());
    }

    #[test]
    fn test_malformed_stored_history_loads_empty() {
        let mut backend = MemoryStore::new();
        backend.set(HISTORY_KEY, "not json at all").unwrap();
        let store = HistoryStore::load(backend);
        assert!(store.is_empty());
    }

    #[test]
    fn test_stored_record_with_bad_stress_code_loads_empty() {
        let vector = MeasurementVector::zeroed();
        let raw = format!(
            r#"[{{"inputs":{},"result":9,"date":"x"}}]"#,
            serde_json::to_string(&vector).unwrap()
        );
        let mut backend = MemoryStore::new();
        backend.set(HISTORY_KEY, &raw).unwrap();
        let store = HistoryStore::load(backend);
        assert!(store.is_empty());
    }

    #[test]
    fn test_legacy_record_without_advice_decodes() {
        let vector = MeasurementVector::zeroed();
        let raw = format!(
            r#"[{{"inputs":{},"result":0,"date":"8/29/2026, 10:00:00 AM"}}]"#,
            serde_json::to_string(&vector).unwrap()
        );
        let mut backend = MemoryStore::new();
        backend.set(HISTORY_KEY, &raw).unwrap();
        let store = HistoryStore::load(backend);
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].advice, None);
    }

    #[test]
    fn test_json_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!(
            "stress-insight-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let mut backend = JsonFileStore::new(&dir);
        assert_eq!(backend.get("absent"), None);
        backend.set("k", "v").unwrap();
        assert_eq!(backend.get("k").as_deref(), Some("v"));
        backend.remove("k").unwrap();
        backend.remove("k").unwrap();
        assert_eq!(backend.get("k"), None);
        fs::remove_dir_all(dir).unwrap();
    }
}
