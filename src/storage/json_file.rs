use crate::error::{AppError, AppResult, StorageError};
use crate::models::StoreDocument;
use crate::storage::DocumentStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 基于 JSON 文件的文档存储
///
/// 写入先落到同目录的临时文件，再 rename 覆盖，避免半写状态
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
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
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> AppResult<StoreDocument> {
        if !self.path.exists() {
            debug!("文档 {} 不存在，使用默认值", self.display_path());
            return Ok(StoreDocument::default());
        }

        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::storage_read_failed(self.display_path(), e))?;

        if json.trim().is_empty() {
            return Ok(StoreDocument::default());
        }

        serde_json::from_str(&json).map_err(|e| {
            StorageError::ParseFailed {
                path: self.display_path(),
                source: Box::new(e),
            }
            .into()
        })
    }

    async fn save(&self, doc: &StoreDocument) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage_write_failed(self.display_path(), e))?;
        }

        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| AppError::storage_write_failed(self.display_path(), e))?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| AppError::storage_write_failed(self.display_path(), e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| AppError::storage_write_failed(self.display_path(), e))?;

        debug!("已保存文档: {}", self.display_path());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        let doc = store.load().await.unwrap();
        assert!(doc.applications.is_empty());
        assert_eq!(doc.settings.daily_limit, 50);
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("data.json"));

        let mut doc = StoreDocument::default();
        doc.settings.daily_limit = 7;
        doc.session.is_processing = true;
        doc.push_error("boom", "network");
        store.save(&doc).await.unwrap();

        assert!(!store.temp_path().exists());
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn test_partial_document_is_merged_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        tokio::fs::write(&path, r#"{"settings":{"dailyLimit":3},"isUnknownField":1}"#)
            .await
            .unwrap();

        let doc = JsonFileStore::new(&path).load().await.unwrap();
        assert_eq!(doc.settings.daily_limit, 3);
        assert!(doc.settings.smart_filter_enabled);
        assert!(!doc.custom_answers.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let err = JsonFileStore::new(&path).load().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Storage(StorageError::ParseFailed { .. })
        ));
    }
}
