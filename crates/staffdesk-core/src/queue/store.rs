// ── Key-value persistence ──
//
// Storage boundary for the offline queue. `MemoryStore` backs tests and
// ephemeral sessions; `FileStore` keeps one JSON file per key and
// replaces it atomically via a sibling temp file and rename.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::CoreError;

/// String-keyed document store.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;

    fn put(&self, key: &str, value: String) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── MemoryStore ──────────────────────────────────────────────────────

/// In-process store. Clones share the same entries, so a test can keep a
/// handle and reopen a queue over the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> Result<(), CoreError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

// ── FileStore ────────────────────────────────────────────────────────

/// One `<key>.json` file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(CoreError::Storage {
                message: format!("invalid store key '{key}'"),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), "persisted store entry");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── LocalStore ───────────────────────────────────────────────────────

/// The store chosen at startup: on disk when a data directory is
/// configured, in memory otherwise.
#[derive(Debug, Clone)]
pub enum LocalStore {
    Memory(MemoryStore),
    File(FileStore),
}

impl LocalStore {
    pub fn for_dir(dir: Option<PathBuf>) -> Self {
        dir.map_or_else(|| Self::Memory(MemoryStore::new()), |d| Self::File(FileStore::new(d)))
    }
}

impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        match self {
            Self::Memory(s) => s.get(key).await,
            Self::File(s) => s.get(key).await,
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), CoreError> {
        match self {
            Self::Memory(s) => s.put(key, value).await,
            Self::File(s) => s.put(key, value).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        match self {
            Self::Memory(s) => s.delete(key).await,
            Self::File(s) => s.delete(key).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.put("k", "v".into()).await.unwrap();
        assert_eq!(b.get("k").await.unwrap().as_deref(), Some("v"));
        b.delete("k").await.unwrap();
        assert_eq!(a.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_round_trip_and_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("offline-queue").await.unwrap(), None);

        store.put("offline-queue", "[1]".into()).await.unwrap();
        store.put("offline-queue", "[1,2]".into()).await.unwrap();
        assert_eq!(
            store.get("offline-queue").await.unwrap().as_deref(),
            Some("[1,2]")
        );
        assert!(!dir.path().join("nested/offline-queue.json.tmp").exists());

        store.delete("offline-queue").await.unwrap();
        store.delete("offline-queue").await.unwrap();
        assert_eq!(store.get("offline-queue").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let err = store.put("../escape", "x".into()).await.unwrap_err();
        assert!(matches!(err, CoreError::Storage { .. }));
    }
}
