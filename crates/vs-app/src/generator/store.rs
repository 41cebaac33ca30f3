#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::Mutex;

use anyhow::{Context, Result};
use log::{info, warn};
use vs_core::Ledger;

/// Key the ledger is stored under.
pub const LEDGER_KEY: &str = "velostream_videos";

/// Durable key/value storage for serialized state.
pub trait LedgerStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Move the value under `key` out of the way, keeping a copy that
    /// later saves do not overwrite.
    fn backup(&self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        info!("Setting up ledger store at {}", dir.display());

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LedgerStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("Failed to replace {}", path.display()))?;

        Ok(())
    }

    fn backup(&self, key: &str) -> Result<()> {
        let path = self.path(key);
        let bak = path.with_extension("json.bak");

        fs::rename(&path, &bak).with_context(|| format!("Failed to move {} aside", path.display()))?;
        info!("Moved {} to {}", path.display(), bak.display());

        Ok(())
    }
}

/// In-process store, nothing survives a restart.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.entries_mut().insert(key.to_string(), value.to_string());
        store
    }

    fn entries_mut(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
impl LedgerStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries_mut().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn backup(&self, key: &str) -> Result<()> {
        let mut entries = self.entries_mut();
        if let Some(value) = entries.remove(key) {
            entries.insert(format!("{key}.bak"), value);
        }
        Ok(())
    }
}

/// Read the ledger, falling back to an empty one when nothing usable is stored.
pub fn load_ledger(store: &dyn LedgerStore) -> Ledger {
    let raw = match store.load(LEDGER_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Ledger::new(),
        Err(e) => {
            warn!("Could not read saved videos, starting empty: {e:#}");
            return Ledger::new();
        }
    };

    match Ledger::from_json(&raw) {
        Ok(ledger) => ledger,
        Err(e) => {
            warn!("Saved videos are malformed, starting empty: {e}");
            if let Err(e) = store.backup(LEDGER_KEY) {
                warn!("Could not keep a copy of the malformed videos: {e:#}");
            }
            Ledger::new()
        }
    }
}

pub fn save_ledger(store: &dyn LedgerStore, ledger: &Ledger) -> Result<()> {
    let json = ledger.to_json().context("Failed to serialize videos")?;
    store.save(LEDGER_KEY, &json)
}
