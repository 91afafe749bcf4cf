//! Implements CachePort using a single JSON file.
//!
//! The keyspace is held in memory; `flush` writes it out with the atomic
//! write-replace pattern so a crash mid-write never leaves a torn file.

use crate::adapters::persistence::memory_cache::CacheData;
use crate::domain::{DomainError, FieldMap};
use crate::ports::CachePort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// JSON file-backed cache.
pub struct JsonFileCache {
    path: PathBuf,
    data: tokio::sync::RwLock<CacheData>,
}

impl JsonFileCache {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            data: tokio::sync::RwLock::new(CacheData::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the keyspace from disk. A missing file yields an empty cache;
    /// an unreadable one is logged and discarded (it is rebuildable data).
    pub async fn load(&self) -> Result<(), DomainError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(data) => data,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "discarding unreadable cache file");
                    CacheData::default()
                }
            },
            Err(_) => CacheData::default(),
        };
        let keys = data.len();
        *self.data.write().await = data;
        info!(path = %self.path.display(), keys, "loaded JSON cache");
        Ok(())
    }

    /// Write to a temp file, sync it, then rename over the target.
    async fn save(&self) -> Result<(), DomainError> {
        let data = self.data.read().await;
        let json = serde_json::to_string(&*data).map_err(|e| DomainError::Cache(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Cache(format!("create cache dir: {}", e)))?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Cache(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Cache(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Cache(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Cache(format!("atomic rename failed: {}", e)))?;

        info!(path = %self.path.display(), keys = data.len(), "saved JSON cache");
        Ok(())
    }
}

#[async_trait::async_trait]
impl CachePort for JsonFileCache {
    async fn write_set(&self, set_name: &str, members: &[String]) -> Result<(), DomainError> {
        self.data.write().await.add_members(set_name, members);
        Ok(())
    }

    async fn read_set(&self, set_name: &str) -> Result<Vec<String>, DomainError> {
        Ok(self.data.read().await.members(set_name))
    }

    async fn write_record(&self, key: &str, fields: &FieldMap) -> Result<(), DomainError> {
        self.data.write().await.merge_record(key, fields);
        Ok(())
    }

    async fn read_record(&self, key: &str) -> Result<Option<FieldMap>, DomainError> {
        Ok(self.data.read().await.record(key))
    }

    async fn delete_key(&self, key: &str) -> Result<(), DomainError> {
        self.data.write().await.remove(key);
        Ok(())
    }

    async fn flush(&self) -> Result<(), DomainError> {
        self.save().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flush_then_load_restores_keyspace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let cache = JsonFileCache::new(&path);
        cache.write_set("t/years", &["2021".into()]).await.unwrap();
        let mut fields = FieldMap::new();
        fields.insert("year".into(), "2021".into());
        cache.write_record("t/year/2021", &fields).await.unwrap();
        cache.flush().await.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let reopened = JsonFileCache::new(&path);
        reopened.load().await.unwrap();
        assert_eq!(reopened.read_set("t/years").await.unwrap(), vec!["2021"]);
        assert_eq!(
            reopened.read_record("t/year/2021").await.unwrap(),
            Some(fields)
        );
    }

    #[tokio::test]
    async fn test_load_tolerates_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = JsonFileCache::new(dir.path().join("nope.json"));
        missing.load().await.unwrap();
        assert!(missing.read_set("t/years").await.unwrap().is_empty());

        let corrupt_path = dir.path().join("corrupt.json");
        std::fs::write(&corrupt_path, "{ not json").unwrap();
        let corrupt = JsonFileCache::new(&corrupt_path);
        corrupt.load().await.unwrap();
        assert!(corrupt.read_record("t/year/2021").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_writes_are_not_persisted_until_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        let cache = JsonFileCache::new(&path);
        cache.write_set("t/weeks", &["2021-01".into()]).await.unwrap();
        assert!(!path.exists());
        cache.flush().await.unwrap();
        assert!(path.exists());
    }
}
