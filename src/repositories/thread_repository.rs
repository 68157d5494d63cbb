use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::ThreadItem,
};

/// Ordered conversation history.
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn create_thread(&self) -> AppResult<String>;
    async fn thread_exists(&self, conversation_id: &str) -> AppResult<bool>;
    /// Appends to the thread, creating it on first use.
    async fn append_item(&self, item: ThreadItem) -> AppResult<()>;
    /// Replaces the item with the same id in place.
    async fn replace_item(&self, item: ThreadItem) -> AppResult<()>;
    async fn load_item(&self, conversation_id: &str, item_id: &str)
        -> AppResult<Option<ThreadItem>>;
    /// Most recent `limit` items, oldest first.
    async fn load_recent_items(&self, conversation_id: &str, limit: usize)
        -> AppResult<Vec<ThreadItem>>;
    async fn list_items(&self, conversation_id: &str) -> AppResult<Vec<ThreadItem>>;
}

#[derive(Default)]
pub struct InMemoryThreadRepository {
    threads: Arc<RwLock<HashMap<String, Vec<ThreadItem>>>>,
}

impl InMemoryThreadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ThreadRepository for InMemoryThreadRepository {
    async fn create_thread(&self) -> AppResult<String> {
        let id = format!("thr_{}", Uuid::new_v4().simple());
        self.threads.write().await.insert(id.clone(), Vec::new());
        log::info!("Created conversation {}", id);
        Ok(id)
    }

    async fn thread_exists(&self, conversation_id: &str) -> AppResult<bool> {
        Ok(self.threads.read().await.contains_key(conversation_id))
    }

    async fn append_item(&self, item: ThreadItem) -> AppResult<()> {
        let mut threads = self.threads.write().await;
        threads
            .entry(item.conversation_id().to_string())
            .or_default()
            .push(item);
        Ok(())
    }

    async fn replace_item(&self, item: ThreadItem) -> AppResult<()> {
        let mut threads = self.threads.write().await;
        let slot = threads
            .get_mut(item.conversation_id())
            .and_then(|items| items.iter_mut().find(|existing| existing.id() == item.id()))
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Item '{}' not found in conversation '{}'",
                    item.id(),
                    item.conversation_id()
                ))
            })?;
        *slot = item;
        Ok(())
    }

    async fn load_item(
        &self,
        conversation_id: &str,
        item_id: &str,
    ) -> AppResult<Option<ThreadItem>> {
        let threads = self.threads.read().await;
        Ok(threads
            .get(conversation_id)
            .and_then(|items| items.iter().find(|item| item.id() == item_id))
            .cloned())
    }

    async fn load_recent_items(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> AppResult<Vec<ThreadItem>> {
        let threads = self.threads.read().await;
        let Some(items) = threads.get(conversation_id) else {
            return Ok(vec![]);
        };

        let start = items.len().saturating_sub(limit);
        Ok(items[start..].to_vec())
    }

    async fn list_items(&self, conversation_id: &str) -> AppResult<Vec<ThreadItem>> {
        let threads = self.threads.read().await;
        threads.get(conversation_id).cloned().ok_or_else(|| {
            AppError::NotFound(format!("Conversation '{}' not found", conversation_id))
        })
    }
}
