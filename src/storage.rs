use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{FlagError, Result};
use crate::flag::SerializedFlag;

/// Persistence boundary for flag configuration. Implementations hold no
/// evaluation logic; they move serialized flag maps in and out of a store.
pub trait FlagStore {
    /// Load every stored flag. An empty store loads as an empty map.
    fn load(&self) -> Result<BTreeMap<String, SerializedFlag>>;

    /// Replace the stored flag map wholesale.
    fn save(&self, flags: &BTreeMap<String, SerializedFlag>) -> Result<()>;

    /// Fetch one stored flag by name.
    fn get_item(&self, name: &str) -> Result<Option<SerializedFlag>> {
        Ok(self.load()?.remove(name))
    }

    /// Insert or replace one stored flag.
    fn set_item(&self, name: &str, flag: SerializedFlag) -> Result<()> {
        let mut flags = self.load()?;
        flags.insert(name.to_string(), flag);
        self.save(&flags)
    }

    /// Remove one stored flag; absent names are a no-op.
    fn remove_item(&self, name: &str) -> Result<()> {
        let mut flags = self.load()?;
        if flags.remove(name).is_some() {
            self.save(&flags)?;
        }
        Ok(())
    }

    /// Drop every stored flag.
    fn clear(&self) -> Result<()> {
        self.save(&BTreeMap::new())
    }
}

/// Flag store backed by a single JSON file: one object keyed by flag name.
/// A missing file reads as an empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Merge `initial` beneath whatever is already stored: flags present in
    /// the store keep their stored definition, new names are added.
    pub fn seed(&self, initial: &BTreeMap<String, SerializedFlag>) -> Result<()> {
        let existing = self.load()?;
        let mut merged = initial.clone();
        merged.extend(existing);
        self.save(&merged)
    }
}

impl FlagStore for JsonFileStore {
    fn load(&self) -> Result<BTreeMap<String, SerializedFlag>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(FlagError::Storage(e)),
        };
        serde_json::from_str(&data)
            .map_err(|e| FlagError::InvalidValue(format!("{}: {e}", self.path.display())))
    }

    fn save(&self, flags: &BTreeMap<String, SerializedFlag>) -> Result<()> {
        let json = serde_json::to_string_pretty(flags)
            .map_err(|e| FlagError::InvalidValue(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
