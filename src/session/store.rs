//! Key-value settings stores.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::SettingsError;

/// Opaque persisted key-value store for float settings.
pub trait SettingsStore {
    fn get_f32(&self, key: &str) -> Option<f32>;

    fn set_f32(&mut self, key: &str, value: f32);

    /// Flush pending writes.
    fn persist(&mut self) -> Result<(), SettingsError>;
}

/// Store that lives only as long as the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: FxHashMap<String, f32>,
    persist_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `persist` was called.
    #[must_use]
    pub fn persist_count(&self) -> usize {
        self.persist_count
    }
}

impl SettingsStore for MemoryStore {
    fn get_f32(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    fn set_f32(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
    }

    fn persist(&mut self) -> Result<(), SettingsError> {
        self.persist_count += 1;
        Ok(())
    }
}

/// Store backed by a JSON object on disk.
///
/// Values are only written on `persist`.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, f32>,
}

impl JsonFileStore {
    /// Open a store, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(SettingsError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn get_f32(&self, key: &str) -> Option<f32> {
        self.values.get(key).copied()
    }

    fn set_f32(&mut self, key: &str, value: f32) {
        self.values.insert(key.to_string(), value);
    }

    fn persist(&mut self) -> Result<(), SettingsError> {
        let raw = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, raw).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "settings persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("concentration-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_f32("MusicVolume"), None);

        store.set_f32("MusicVolume", 0.5);
        assert_eq!(store.get_f32("MusicVolume"), Some(0.5));

        store.persist().unwrap();
        assert_eq!(store.persist_count(), 1);
    }

    #[test]
    fn test_json_store_round_trip() {
        let path = temp_path("round-trip");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_f32("SFXVolume"), None);
        store.set_f32("SFXVolume", 0.25);
        store.persist().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_f32("SFXVolume"), Some(0.25));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let path = temp_path("garbage");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));

        std::fs::remove_file(&path).unwrap();
    }
}
