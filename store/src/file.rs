//! File-backed preference storage.
//!
//! All keys live in one TOML file of string pairs. The file is rewritten
//! atomically (temp file + rename in the target directory) on every write,
//! so a crash mid-write leaves either the old or the new file, never a torn
//! one. An unreadable or malformed file degrades to an empty map with a
//! warning; preferences are not worth refusing to start over.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::{fs, io};

use tempfile::NamedTempFile;
use tracing::warn;

use crate::storage::Storage;

/// TOML-file storage, one string value per key.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open (or lazily create) the preference file at `path`.
    ///
    /// The file is only written on the first `set`, so opening never creates
    /// directories for a session that changes nothing.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        if let Err(e) = write_atomic(&self.path, entries) {
            warn!(path = %self.path.display(), "Failed to persist preferences: {e}");
        }
    }
}

fn load(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), "Failed to read preferences, starting empty: {e}");
            return BTreeMap::new();
        }
    };

    match toml::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), "Malformed preference file, starting empty: {e}");
            BTreeMap::new()
        }
    }
}

fn write_atomic(path: &Path, entries: &BTreeMap<String, String>) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let body = toml::to_string(entries).map_err(io::Error::other)?;

    // Temp file in the same directory so the rename stays on one filesystem.
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(body.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.toml");

        let storage = FileStorage::open(&path);
        storage.set("language", "en");
        storage.set("theme", "dark");
        drop(storage);

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("language").as_deref(), Some("en"));
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn remove_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.toml");

        let storage = FileStorage::open(&path);
        storage.set("cookieConsent", "true");
        storage.remove("cookieConsent");
        drop(storage);

        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("cookieConsent"), None);
    }

    #[test]
    fn malformed_file_degrades_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "not = [valid").expect("write");

        let storage = FileStorage::open(&path);
        assert_eq!(storage.get("language"), None);

        // Writing afterwards replaces the malformed file wholesale.
        storage.set("language", "fr");
        let reopened = FileStorage::open(&path);
        assert_eq!(reopened.get("language").as_deref(), Some("fr"));
    }

    #[test]
    fn missing_file_is_empty_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::open(dir.path().join("absent.toml"));
        assert_eq!(storage.get("theme"), None);
    }

    #[test]
    fn open_creates_parent_directories_on_first_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("deeper").join("prefs.toml");

        let storage = FileStorage::open(&path);
        storage.set("theme", "light");
        assert!(path.exists());
    }
}
