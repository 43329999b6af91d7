//! Key-value persistence behind the reader session.
//!
//! Stores never fail: an unreadable or unwritable backing file degrades to
//! "nothing stored", which the rest of the client treats as signed out.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

fn lock(entries: &Mutex<HashMap<String, String>>) -> MutexGuard<'_, HashMap<String, String>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        lock(&self.entries).insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        lock(&self.entries).remove(key);
    }
}

/// A JSON object on disk, loaded once and written through on every change.
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileSessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Write `entries` to disk and adopt them only if the write succeeds.
    fn commit(&self, current: &mut HashMap<String, String>, entries: HashMap<String, String>) {
        match write_entries(&self.path, &entries) {
            Ok(()) => *current = entries,
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Session storage unavailable, change dropped"
            ),
        }
    }
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read session file");
            return HashMap::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt session file");
        HashMap::new()
    })
}

fn write_entries(path: &Path, entries: &HashMap<String, String>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let raw = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, raw)?;
    Ok(())
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut current = lock(&self.entries);
        let mut entries = current.clone();
        entries.insert(key.to_string(), value.to_string());
        self.commit(&mut current, entries);
    }

    fn remove(&self, key: &str) {
        let mut current = lock(&self.entries);
        if !current.contains_key(key) {
            return;
        }
        let mut entries = current.clone();
        entries.remove(key);
        self.commit(&mut current, entries);
    }
}
