use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::NamedTempFile;

/// Key holding the serialized task list
pub const TASKS_KEY: &str = "tasks";
/// Key holding the theme preference literal
pub const THEME_KEY: &str = "color-theme";

/// Error type for key-value storage
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// The raw bytes are kept, lossily decoded, so they can be recovered
    #[error("{path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf, lossy: String },
    #[error("storage is read-only")]
    ReadOnly,
}

/// String-keyed, string-valued persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Stores each key as a file in one directory. Clones share the directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::Io {
            path: dir.clone(),
            source: e,
        })?;
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(value) => Ok(Some(value)),
                Err(e) => Err(StorageError::InvalidUtf8 {
                    lossy: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                    path,
                }),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        atomic_write(&path, value.as_bytes()).map_err(|e| StorageError::Io { path, source: e })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io { path, source: e }),
        }
    }
}

/// Keys double as file names: lowercase ASCII, digits and hyphens only.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// In-process store. Clones share the same map, so a test can keep one
/// handle to inspect what another handle wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Start with a single key already set
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = MemoryStore::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// Make every later `set`/`remove` fail with `StorageError::ReadOnly`
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Number of successful `set` calls across all clones
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Current raw value of a key
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only.get() {
            return Err(StorageError::ReadOnly);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.read_only.get() {
            return Err(StorageError::ReadOnly);
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get(TASKS_KEY).unwrap(), None);
        store.set(TASKS_KEY, "[]").unwrap();
        assert_eq!(store.get(TASKS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(fs::read_to_string(dir.path().join("tasks")).unwrap(), "[]");

        store.set(THEME_KEY, "dark").unwrap();
        store.set(THEME_KEY, "light").unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn file_store_reports_invalid_utf8_with_lossy_text() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tasks"), b"caf\xE9 list").unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        match store.get(TASKS_KEY) {
            Err(StorageError::InvalidUtf8 { lossy, .. }) => {
                assert_eq!(lossy, "caf\u{FFFD} list");
            }
            other => panic!("expected InvalidUtf8, got {:?}", other),
        }
    }

    #[test]
    fn file_store_clones_share_directory() {
        let dir = TempDir::new().unwrap();
        let mut a = FileStore::open(dir.path()).unwrap();
        let b = a.clone();
        a.set(THEME_KEY, "dark").unwrap();
        assert_eq!(b.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn file_store_remove_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.remove(TASKS_KEY).unwrap();
        store.set(TASKS_KEY, "[]").unwrap();
        store.remove(TASKS_KEY).unwrap();
        assert_eq!(store.get(TASKS_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_creates_nested_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        let mut store = FileStore::open(&nested).unwrap();
        store.set(TASKS_KEY, "[]").unwrap();
        assert!(nested.join("tasks").exists());
    }

    #[test]
    fn keys_must_be_plain_names() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.get("Tasks"), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn memory_store_clones_share_entries() {
        let mut a = MemoryStore::new();
        let b = a.clone();
        a.set(TASKS_KEY, "[]").unwrap();
        assert_eq!(b.raw(TASKS_KEY).as_deref(), Some("[]"));
        assert_eq!(b.write_count(), 1);
    }

    #[test]
    fn memory_store_read_only_rejects_writes() {
        let mut store = MemoryStore::with_entry(THEME_KEY, "dark");
        store.set_read_only(true);
        assert!(matches!(
            store.set(THEME_KEY, "light"),
            Err(StorageError::ReadOnly)
        ));
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(store.write_count(), 0);
    }
}
