/*
[INPUT]:  String keys and values owned by the session managers
[OUTPUT]: Durable client-side key/value persistence
[POS]:    Storage layer - shared store holding the wallet-info and auth-token regions
[UPDATE]: When storage backends or the on-disk format change
*/

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use crate::http::{MooniumError, Result};

/// Synchronous string key/value store, the equivalent of browser local storage.
///
/// Each session manager owns a disjoint set of keys and never reads the others.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Ephemeral in-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// Every mutation rewrites the file through a temp file in the same directory,
/// so readers never observe a half-written document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store; a corrupt file is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(storage_error)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    MooniumError::Storage(format!("corrupt store {}: {e}", path.display()))
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(storage_error)?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        let mut temp = NamedTempFile::new_in(parent).map_err(storage_error)?;
        temp.write_all(json.as_bytes()).map_err(storage_error)?;
        temp.flush().map_err(storage_error)?;
        restrict_permissions(temp.path())?;
        temp.persist(&self.path)
            .map_err(|e| storage_error(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&entries)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn storage_error(err: std::io::Error) -> MooniumError {
    MooniumError::Storage(err.to_string())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path).map_err(storage_error)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms).map_err(storage_error)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("moonium-test-{}", Uuid::new_v4()));
        fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("AccessToken").is_none());

        store.set("AccessToken", "a").unwrap();
        assert_eq!(store.get("AccessToken"), Some("a".to_string()));

        store.remove("AccessToken").unwrap();
        store.remove("AccessToken").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = temp_dir();
        let path = dir.join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set("RefreshToken", "r").unwrap();
        store.set("wallet-info", "{\"wallet\":\"SOLANA:abc\"}").unwrap();
        store.remove("wallet-info").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("RefreshToken"), Some("r".to_string()));
        assert!(reopened.get("wallet-info").is_none());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = temp_dir();
        let path = dir.join("storage.json");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, MooniumError::Storage(_)));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_store_creates_missing_parent() {
        let dir = temp_dir();
        let path = dir.join("nested").join("storage.json");

        let store = FileStore::open(&path).unwrap();
        store.set("AccessToken", "a").unwrap();
        assert!(path.exists());

        fs::remove_dir_all(dir).unwrap();
    }
}
