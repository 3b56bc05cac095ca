//! JSON file user record store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::user::{UserRecord, UserRecordStore};
use crate::domain::DomainError;

/// Keeps the users collection as a pretty-printed JSON array on disk
///
/// Writes go to a sibling `.tmp` file which is synced and renamed over the
/// target, so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileUserStore {
    path: PathBuf,
}

impl JsonFileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "users.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn replace_with(&self, temp_path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(temp_path).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(temp_path, &self.path).await
    }
}

#[async_trait]
impl UserRecordStore for JsonFileUserStore {
    async fn load(&self) -> Result<Vec<UserRecord>, DomainError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Users file missing, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            DomainError::storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, records: &[UserRecord]) -> Result<(), DomainError> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| DomainError::storage(format!("Failed to encode users: {}", e)))?;

        let temp_path = self.temp_path();

        if let Err(e) = self.replace_with(&temp_path, content.as_bytes()).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(
                        path = %temp_path.display(),
                        error = %cleanup,
                        "Failed to remove temp users file"
                    );
                }
            }
            return Err(DomainError::storage(format!(
                "Failed to write users file: {}",
                e
            )));
        }

        debug!(path = %self.path.display(), count = records.len(), "Users file saved");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserCandidate;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileUserStore::new(dir.path().join("users.json"));

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = JsonFileUserStore::new(dir.path().join("users.json"));

        let mut bob = UserRecord::new(Some(2), "Bob", "bob@example.com");
        bob.merge(UserCandidate::new().with_field("city", "Lima"));
        let records = vec![UserRecord::new(Some(1), "Alice", "alice@example.com"), bob];

        store.save(&records).await.unwrap();

        assert_eq!(store.load().await.unwrap(), records);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_failed_save_removes_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "x").unwrap();
        let store = JsonFileUserStore::new(&path);

        let result = store
            .save(&[UserRecord::new(Some(1), "Alice", "alice@example.com")])
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert!(!store.temp_path().exists());
        assert!(path.join("keep").exists());
    }

    #[tokio::test]
    async fn test_saved_file_is_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        let store = JsonFileUserStore::new(&path);

        store
            .save(&[UserRecord::new(Some(1), "Alice", "alice@example.com")])
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n  {"));
        assert!(content.contains("\"name\": \"Alice\""));
    }

    #[tokio::test]
    async fn test_reads_hand_written_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "name": "Ana", "email": "ana@example.com", "phone": "555"}]"#,
        )
        .unwrap();

        let records = JsonFileUserStore::new(&path).load().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), Some(1));
        assert_eq!(records[0].extra().get("phone").unwrap(), "555");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = JsonFileUserStore::new(&path).load().await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
