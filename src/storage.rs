use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use tracing::warn;

/// Durable home of the serialized plant collection.
///
/// One named key holds the whole snapshot: `load` reads it once at startup,
/// `persist` overwrites it after every mutation. Callers serialize writes;
/// implementations only have to make each write land whole.
#[async_trait]
pub trait CollectionStorage: Send + Sync {
    /// Read the stored snapshot, `None` if nothing was ever persisted.
    async fn load(&self) -> anyhow::Result<Option<String>>;
    /// Replace the stored snapshot.
    async fn persist(&self, snapshot: &str) -> anyhow::Result<()>;
}

/// File-backed storage: the snapshot lives in a single JSON file.
#[derive(Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CollectionStorage for JsonFileStorage {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", self.path.display())),
        }
    }

    async fn persist(&self, snapshot: &str) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("create {}", dir.display()))?;
            }
        }
        // Write-then-rename so a crash mid-write never leaves a truncated
        // snapshot behind.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, snapshot)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("rename into {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral runs.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    snapshot: std::sync::Arc<std::sync::Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot contents, for assertions.
    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.lock().expect("storage lock").clone()
    }

    /// Pre-seed the snapshot, e.g. with corrupt data.
    pub fn seed(&self, raw: impl Into<String>) {
        *self.snapshot.lock().expect("storage lock") = Some(raw.into());
    }
}

#[async_trait]
impl CollectionStorage for MemoryStorage {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.snapshot())
    }

    async fn persist(&self, snapshot: &str) -> anyhow::Result<()> {
        *self.snapshot.lock().expect("storage lock") = Some(snapshot.to_string());
        Ok(())
    }
}

/// Decode a stored snapshot, falling back to an empty collection on corrupt
/// or missing data. Startup must never fail on bad local state.
pub fn decode_snapshot<T: serde::de::DeserializeOwned>(raw: Option<String>) -> Vec<T> {
    match raw {
        None => Vec::new(),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "stored collection unreadable, starting empty");
                Vec::new()
            }
        },
    }
}

#[cfg(test)]
mod storage_tests {
    use super::*;

    #[tokio::test]
    async fn file_storage_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("plants.json"));

        assert!(storage.load().await.unwrap().is_none());

        storage.persist(r#"[{"id":1}]"#).await.unwrap();
        assert_eq!(storage.load().await.unwrap().unwrap(), r#"[{"id":1}]"#);

        storage.persist("[]").await.unwrap();
        assert_eq!(storage.load().await.unwrap().unwrap(), "[]");
    }

    #[tokio::test]
    async fn file_storage_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/deep/plants.json"));
        storage.persist("[]").await.unwrap();
        assert_eq!(storage.load().await.unwrap().unwrap(), "[]");
    }

    #[test]
    fn decode_tolerates_missing_and_corrupt_snapshots() {
        let empty: Vec<serde_json::Value> = decode_snapshot(None);
        assert!(empty.is_empty());

        let corrupt: Vec<serde_json::Value> = decode_snapshot(Some("not json".into()));
        assert!(corrupt.is_empty());

        let ok: Vec<serde_json::Value> = decode_snapshot(Some("[1,2]".into()));
        assert_eq!(ok.len(), 2);
    }
}
