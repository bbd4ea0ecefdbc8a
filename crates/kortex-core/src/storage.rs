//! Durable client storage.
//!
//! A flat string-to-string store persisted as a single JSON object file.
//! Every mutation writes through to disk before returning, so a process
//! restart observes exactly what the last call left behind. Two processes
//! sharing the same file are not coordinated: the last writer wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Key holding the session token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the admin flag (`"true"`; anything else reads as false).
pub const IS_ADMIN_KEY: &str = "isAdmin";
/// Key holding the JSON-encoded queue of pending registrations.
pub const PENDING_REGS_KEY: &str = "kortex_pending_regs";
/// Key an unreadable registration queue is moved to before a fresh queue
/// is started.
pub const PENDING_REGS_UNREADABLE_KEY: &str = "kortex_pending_regs_unreadable";

/// Durable key/value store backing the session and the registration queue.
#[derive(Debug, Clone, Default)]
pub struct ClientStorage {
    /// Backing file. `None` keeps everything in memory.
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl ClientStorage {
    /// Open the store at `path`. A missing file yields an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let data = std::fs::read_to_string(path)?;
            serde_json::from_str(&data).map_err(|e| {
                Error::Storage(format!(
                    "Failed to parse client storage {}: {e}",
                    path.display()
                ))
            })?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
        })
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.entries.insert(key.to_string(), value.into());
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    /// Drop every key.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.flush()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        // Write-then-rename so a crash mid-write never leaves a torn file.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ClientStorage::open(&dir.path().join("storage.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get(TOKEN_KEY), None);
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = ClientStorage::open(&path).unwrap();
        store.set(TOKEN_KEY, "abc").unwrap();
        store.set(IS_ADMIN_KEY, "true").unwrap();

        let reopened = ClientStorage::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY), Some("abc"));
        assert_eq!(reopened.get(IS_ADMIN_KEY), Some("true"));
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn clear_wipes_disk_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut store = ClientStorage::open(&path).unwrap();
        store.set(TOKEN_KEY, "abc").unwrap();
        store.set(PENDING_REGS_KEY, "[]").unwrap();
        store.clear().unwrap();

        let reopened = ClientStorage::open(&path).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn remove_only_touches_named_key() {
        let mut store = ClientStorage::in_memory();
        store.set(TOKEN_KEY, "abc").unwrap();
        store.set(IS_ADMIN_KEY, "false").unwrap();
        store.remove(TOKEN_KEY).unwrap();
        store.remove("never-set").unwrap();
        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.get(IS_ADMIN_KEY), Some("false"));
    }

    #[test]
    fn corrupted_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ClientStorage::open(&path).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn in_memory_store_has_no_path() {
        let mut store = ClientStorage::in_memory();
        store.set(TOKEN_KEY, "t").unwrap();
        assert!(store.path().is_none());
        assert_eq!(store.get(TOKEN_KEY), Some("t"));
    }
}
