//! Persistence of plugin state
//!
//! State is two opaque JSON blobs behind the [`Store`] trait. [`FileStore`]
//! keeps them under `<vault>/.math-callout/`, [`MemoryStore`] keeps them
//! in memory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::constants::{DATA_FILENAME, EXTRA_FILENAME, STATE_DIR};
use crate::error::Result;
use crate::state::{ExtraData, PluginData, PluginState};

/// Which blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// `{ settings, excludedFiles }`
    Data,
    /// `{ profiles }`
    Extra,
}

/// Key-value persistence for the two state blobs
pub trait Store {
    /// Raw blob, `None` when never saved
    fn load(&self, slot: Slot) -> Result<Option<String>>;
    fn save(&mut self, slot: Slot, blob: &str) -> Result<()>;
}

/// Load both blobs; missing ones fall back to defaults
pub fn load_state<S: Store + ?Sized>(store: &S) -> Result<PluginState> {
    let data: PluginData = match store.load(Slot::Data)? {
        Some(blob) => serde_json::from_str(&blob)?,
        None => PluginData::default(),
    };
    let extra: ExtraData = match store.load(Slot::Extra)? {
        Some(blob) => serde_json::from_str(&blob)?,
        None => ExtraData::default(),
    };
    Ok(PluginState::new(data, extra))
}

/// Save both blobs
pub fn save_state<S: Store + ?Sized>(store: &mut S, state: &PluginState) -> Result<()> {
    store.save(Slot::Data, &serde_json::to_string_pretty(&state.data)?)?;
    store.save(Slot::Extra, &serde_json::to_string_pretty(&state.extra)?)?;
    Ok(())
}

// === FileStore ===

/// Blobs as `data.json` / `extra.json` in a state directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store in an explicit directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store inside a vault: `<vault>/.math-callout/`
    pub fn for_vault(vault: &Path) -> Self {
        Self::new(vault.join(STATE_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, slot: Slot) -> PathBuf {
        match slot {
            Slot::Data => self.dir.join(DATA_FILENAME),
            Slot::Extra => self.dir.join(EXTRA_FILENAME),
        }
    }
}

impl Store for FileStore {
    fn load(&self, slot: Slot) -> Result<Option<String>> {
        let path = self.path(slot);
        if !path.exists() {
            debug!(path = %path.display(), "no saved state");
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn save(&mut self, slot: Slot, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(slot);
        // Replace atomically through a sibling temp file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "saved state");
        Ok(())
    }
}

// === MemoryStore ===

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<Slot, String>,
    /// Number of `save` calls
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load(&self, slot: Slot) -> Result<Option<String>> {
        Ok(self.blobs.get(&slot).cloned())
    }

    fn save(&mut self, slot: Slot, blob: &str) -> Result<()> {
        self.blobs.insert(slot, blob.to_string());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use crate::numeral::NumberStyle;

    #[test]
    fn test_missing_blobs_load_defaults() {
        let store = MemoryStore::new();
        let state = load_state(&store).unwrap();
        assert_eq!(state, PluginState::default());
        assert!(state.profile("English").is_some());
        assert!(state.profile("Japanese").is_some());
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut state = PluginState::default();
        state.settings_mut(&Location::new("algebra")).number_style = Some(NumberStyle::RomanLower);
        state.data.excluded_files.push("drafts".to_string());
        save_state(&mut store, &state).unwrap();
        assert_eq!(store.saves, 2);

        let loaded = load_state(&store).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_camel_case_on_disk() {
        let mut store = MemoryStore::new();
        let mut state = PluginState::default();
        state.settings_mut(&Location::new("a")).eq_number_init = Some(3);
        state.data.excluded_files.push("x.md".to_string());
        save_state(&mut store, &state).unwrap();

        let blob = store.load(Slot::Data).unwrap().unwrap();
        assert!(blob.contains("\"excludedFiles\""));
        assert!(blob.contains("\"eqNumberInit\": 3"));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::for_vault(dir.path());
        assert!(store.load(Slot::Data).unwrap().is_none());

        store.save(Slot::Extra, "{\"profiles\":{}}").unwrap();
        assert!(dir.path().join(".math-callout/extra.json").exists());
        assert_eq!(store.load(Slot::Extra).unwrap().as_deref(), Some("{\"profiles\":{}}"));
    }
}
