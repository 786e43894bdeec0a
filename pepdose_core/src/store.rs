//! Key-value persistence with file locking.
//!
//! Each key is stored as its own JSON file in a directory. Writes go to a
//! temp file that is locked, synced and renamed over the original, so a
//! reader never sees a half-written value.

use crate::{Error, InjectionStatus, Result, SavedCalculation, ScheduledInjection};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Key holding the list of saved calculations
pub const CALCULATIONS_KEY: &str = "calculations";
/// Key holding the list of scheduled injections
pub const INJECTIONS_KEY: &str = "injections";

/// Opaque key-value store for serializable values
pub trait KeyValueStore {
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()>;
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// Directory-backed store, one `<key>.json` file per key
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::Other(format!("invalid store key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Temp file in the same directory so the rename stays atomic
        let temp = NamedTempFile::new_in(&self.dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(value)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved '{}' to {:?}", key, path);
        Ok(())
    }

    /// Missing keys load as `None`; so do corrupted entries, with a warning
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        match serde_json::from_str::<T>(&contents) {
            Ok(value) => {
                tracing::debug!("Loaded '{}' from {:?}", key, path);
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}. Treating as empty.", path, e);
                Ok(None)
            }
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Append a calculation to the saved list
pub fn save_calculation<S: KeyValueStore>(store: &S, calculation: SavedCalculation) -> Result<()> {
    let mut saved = load_calculations(store)?;
    saved.push(calculation);
    store.save(CALCULATIONS_KEY, &saved)?;
    tracing::info!("Saved calculation ({} total)", saved.len());
    Ok(())
}

/// All saved calculations, oldest first
pub fn load_calculations<S: KeyValueStore>(store: &S) -> Result<Vec<SavedCalculation>> {
    Ok(store
        .load::<Vec<SavedCalculation>>(CALCULATIONS_KEY)?
        .unwrap_or_default())
}

/// Remove a saved calculation by id
pub fn delete_calculation<S: KeyValueStore>(store: &S, id: Uuid) -> Result<()> {
    let mut saved = load_calculations(store)?;
    let before = saved.len();
    saved.retain(|c| c.id != id);
    if saved.len() == before {
        return Err(Error::NotFound(format!("calculation {}", id)));
    }
    store.save(CALCULATIONS_KEY, &saved)?;
    tracing::info!("Deleted calculation {}", id);
    Ok(())
}

/// Add injections to the stored schedule, keeping it in time order
pub fn save_injections<S: KeyValueStore>(
    store: &S,
    injections: &[ScheduledInjection],
) -> Result<()> {
    let mut stored = load_injections(store)?;
    stored.extend_from_slice(injections);
    stored.sort_by_key(|i| i.scheduled_time);
    store.save(INJECTIONS_KEY, &stored)?;
    tracing::info!(
        "Stored {} injections ({} total)",
        injections.len(),
        stored.len()
    );
    Ok(())
}

/// All stored injections
pub fn load_injections<S: KeyValueStore>(store: &S) -> Result<Vec<ScheduledInjection>> {
    Ok(store
        .load::<Vec<ScheduledInjection>>(INJECTIONS_KEY)?
        .unwrap_or_default())
}

/// Move a stored injection to `status`
///
/// Completing stamps `completed_at` with `at`; any other status clears it.
/// Returns the updated injection.
pub fn update_injection_status<S: KeyValueStore>(
    store: &S,
    id: Uuid,
    status: InjectionStatus,
    at: DateTime<Utc>,
) -> Result<ScheduledInjection> {
    let mut stored = load_injections(store)?;
    let injection = stored
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| Error::NotFound(format!("injection {}", id)))?;

    injection.status = status;
    injection.completed_at = match status {
        InjectionStatus::Completed => Some(at),
        _ => None,
    };
    let updated = injection.clone();

    store.save(INJECTIONS_KEY, &stored)?;
    tracing::info!("Injection {} marked {}", id, status);
    Ok(updated)
}

/// Remove a stored injection by id
pub fn delete_injection<S: KeyValueStore>(store: &S, id: Uuid) -> Result<()> {
    let mut stored = load_injections(store)?;
    let before = stored.len();
    stored.retain(|i| i.id != id);
    if stored.len() == before {
        return Err(Error::NotFound(format!("injection {}", id)));
    }
    store.save(INJECTIONS_KEY, &stored)?;
    tracing::info!("Deleted injection {}", id);
    Ok(())
}
