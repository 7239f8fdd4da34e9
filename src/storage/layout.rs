//! Persisted column widths, per view.
//!
//! File format is a JSON object `{ "<view>": { "<column key>": <width> } }`.
//! Only explicit user resizes are recorded; columns without an entry keep
//! their declared width.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::location::View;

/// Errors from writing the layout file.
#[derive(Debug)]
pub enum LayoutError {
    Io(io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Io(e) => write!(f, "layout I/O error: {}", e),
            LayoutError::Serialize(e) => write!(f, "layout serialization error: {}", e),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::Io(e) => Some(e),
            LayoutError::Serialize(e) => Some(e),
        }
    }
}

impl From<io::Error> for LayoutError {
    fn from(e: io::Error) -> Self {
        LayoutError::Io(e)
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::Serialize(e)
    }
}

type Widths = BTreeMap<String, BTreeMap<String, u16>>;

/// Column widths keyed by view path, optionally backed by a file.
#[derive(Debug, Default)]
pub struct LayoutStore {
    path: Option<PathBuf>,
    widths: Widths,
    dirty: bool,
}

impl LayoutStore {
    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads `path`. A missing file yields an empty layout; an unreadable
    /// or corrupt one is logged and also yields an empty layout.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let widths = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Widths>(&text) {
                Ok(widths) => {
                    debug!(path = %path.display(), views = widths.len(), "layout loaded");
                    widths
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring corrupt layout file");
                    Widths::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Widths::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read layout file");
                Widths::new()
            }
        };
        Self {
            path: Some(path),
            widths,
            dirty: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Saved widths for a view, suitable for `ResizableTable::apply_width_overrides`.
    pub fn widths(&self, view: View) -> HashMap<String, u16> {
        self.widths
            .get(view.path())
            .map(|m| m.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, view: View, key: &str) -> Option<u16> {
        self.widths.get(view.path())?.get(key).copied()
    }

    /// Records a committed resize in memory.
    pub fn record(&mut self, view: View, key: &str, width: u16) {
        let entry = self.widths.entry(view.path().to_string()).or_default();
        if entry.insert(key.to_string(), width) != Some(width) {
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Writes the layout if it changed since the last save. The file is
    /// replaced atomically through a sibling temp file.
    pub fn save(&mut self) -> Result<(), LayoutError> {
        let Some(path) = self.path.as_ref() else {
            self.dirty = false;
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.widths)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;

        info!(path = %path.display(), "layout saved");
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty_layout() {
        let dir = tempdir().unwrap();
        let store = LayoutStore::load(dir.path().join("layout.json"));
        assert!(store.widths(View::Factors).is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn corrupt_file_is_empty_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, "{ not json").unwrap();
        let store = LayoutStore::load(&path);
        assert!(store.widths(View::Notes).is_empty());
    }

    #[test]
    fn round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("layout.json");

        let mut store = LayoutStore::load(&path);
        store.record(View::Factors, "name", 40);
        store.record(View::Strategies, "sharpe_ratio", 12);
        assert!(store.is_dirty());
        store.save().unwrap();
        assert!(!store.is_dirty());
        assert!(!path.with_extension("json.tmp").exists());

        let reloaded = LayoutStore::load(&path);
        assert_eq!(reloaded.get(View::Factors, "name"), Some(40));
        assert_eq!(reloaded.widths(View::Strategies)["sharpe_ratio"], 12);
        assert_eq!(reloaded.get(View::Notes, "title"), None);
    }

    #[test]
    fn recording_the_same_width_is_not_a_change() {
        let mut store = LayoutStore::in_memory();
        store.record(View::Notes, "title", 30);
        store.save().unwrap();
        store.record(View::Notes, "title", 30);
        assert!(!store.is_dirty());
        store.record(View::Notes, "title", 31);
        assert!(store.is_dirty());
    }
}
