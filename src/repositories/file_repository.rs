use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{errors::AppResult, models::domain::StoredFile};

/// Volatile blob store for uploaded attachments.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Store bytes under a freshly generated id.
    async fn save(&self, filename: &str, content_type: &str, data: Vec<u8>) -> AppResult<String>;
    /// Store (or replace) a file under a caller-chosen id.
    async fn put(&self, file: StoredFile) -> AppResult<()>;
    async fn load(&self, id: &str) -> AppResult<Option<StoredFile>>;
    async fn delete(&self, id: &str) -> AppResult<()>;
}

#[derive(Default)]
pub struct InMemoryFileRepository {
    files: Arc<RwLock<HashMap<String, StoredFile>>>,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn save(&self, filename: &str, content_type: &str, data: Vec<u8>) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        let file = StoredFile::new(&id, filename, content_type, data);
        log::info!("Saved file {} ({} bytes) as {}", filename, file.size, id);

        self.files.write().await.insert(id.clone(), file);
        Ok(id)
    }

    async fn put(&self, file: StoredFile) -> AppResult<()> {
        log::info!(
            "Stored file {}: {} bytes, type: {}",
            file.id,
            file.size,
            file.content_type
        );
        self.files.write().await.insert(file.id.clone(), file);
        Ok(())
    }

    async fn load(&self, id: &str) -> AppResult<Option<StoredFile>> {
        let files = self.files.read().await;
        Ok(files.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.files.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_load_returns_bytes_and_metadata() {
        let repo = InMemoryFileRepository::new();

        let id = repo
            .save("notes.pdf", "application/pdf", vec![1, 2, 3])
            .await
            .expect("save should work");
        let file = repo.load(&id).await.expect("load should work").expect("file exists");

        assert_eq!(file.filename, "notes.pdf");
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.data, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn put_replaces_under_same_id() {
        let repo = InMemoryFileRepository::new();

        repo.put(StoredFile::new("up-1", "a.txt", "text/plain", vec![]))
            .await
            .expect("put placeholder");
        repo.put(StoredFile::new("up-1", "a.txt", "text/plain", b"abc".to_vec()))
            .await
            .expect("put data");

        let file = repo.load("up-1").await.expect("load").expect("file exists");
        assert_eq!(file.size, 3);
    }

    #[tokio::test]
    async fn delete_missing_file_is_noop() {
        let repo = InMemoryFileRepository::new();
        repo.delete("nope").await.expect("delete should not fail");
        assert!(repo.load("nope").await.expect("load").is_none());
    }
}
