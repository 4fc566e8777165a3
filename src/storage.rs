use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use async_trait::async_trait;
use tracing::debug;

/// String-keyed key-value medium the credential store persists into.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    async fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

/// In-process storage, used by tests and anywhere nothing should hit disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text for `key`, if any.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        anyhow::ensure!(!key.is_empty(), "storage key must not be empty");
        anyhow::ensure!(
            !key.contains(['/', '\\']) && !key.contains(".."),
            "invalid storage key {:?}",
            key
        );
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                debug!(key, bytes = text.len(), "storage read");
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create {}", self.dir.display()))?;
        tokio::fs::write(&path, value)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        debug!(key, bytes = value.len(), "storage write");
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "storage remove");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_storage_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").await.unwrap(), None);

        storage.set_item("k", "v1").await.unwrap();
        storage.set_item("k", "v2").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.snapshot("k").as_deref(), Some("v2"));

        storage.remove_item("k").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_storage_creates_dir_and_round_trips() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(tmp.path().join("nested"));

        assert_eq!(storage.get_item("users").await.unwrap(), None);
        storage.set_item("users", "[]").await.unwrap();
        assert!(tmp.path().join("nested/users.json").exists());
        assert_eq!(storage.get_item("users").await.unwrap().as_deref(), Some("[]"));

        storage.remove_item("users").await.unwrap();
        assert_eq!(storage.get_item("users").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_storage_remove_missing_is_noop() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(tmp.path());
        storage.remove_item("current_user").await.expect("no-op");
    }

    #[tokio::test]
    async fn file_storage_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(tmp.path());
        for key in ["", "../escape", "a/b", "a\\b"] {
            let err = storage.set_item(key, "x").await.unwrap_err();
            assert!(!err.to_string().is_empty());
        }
    }
}
