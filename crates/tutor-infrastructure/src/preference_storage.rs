//! File-backed preference store.
//!
//! Preferences live in a flat TOML table (`preferences.toml`):
//!
//! ```toml
//! sidebar_state = "closed"
//! theme = "dark"
//! ```

use crate::paths::TutorPaths;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tutor_core::error::{Result, TutorError};
use tutor_core::preferences::PreferenceStore;

/// Stores each preference as a string under its own key.
///
/// The file is re-read on every `get` so edits made while the client runs are
/// picked up. Writes are serialized through a mutex.
#[derive(Debug)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TomlPreferenceStore {
    /// Uses the platform preferences file.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(TutorPaths::preferences_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| TutorError::internal("preference lock poisoned"))?;
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&values)?)?;
        tracing::debug!("[TomlPreferenceStore] {} = {}", key, value);
        Ok(())
    }
}
