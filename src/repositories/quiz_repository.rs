use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{errors::AppResult, models::domain::QuizRecord};

/// Current quiz per conversation. Last write wins; no history of earlier
/// quizzes is kept.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn save(&self, conversation_id: &str, record: QuizRecord) -> AppResult<()>;
    async fn load(&self, conversation_id: &str) -> AppResult<Option<QuizRecord>>;
    async fn delete(&self, conversation_id: &str) -> AppResult<()>;
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, QuizRecord>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn save(&self, conversation_id: &str, record: QuizRecord) -> AppResult<()> {
        log::info!(
            "Saving quiz '{}' for conversation {}",
            record.title,
            conversation_id
        );
        let mut quizzes = self.quizzes.write().await;
        quizzes.insert(conversation_id.to_string(), record);
        Ok(())
    }

    async fn load(&self, conversation_id: &str) -> AppResult<Option<QuizRecord>> {
        let quizzes = self.quizzes.read().await;
        let record = quizzes.get(conversation_id).cloned();
        log::debug!(
            "Loading quiz for conversation {}: {}",
            conversation_id,
            if record.is_some() { "found" } else { "not found" }
        );
        Ok(record)
    }

    async fn delete(&self, conversation_id: &str) -> AppResult<()> {
        let mut quizzes = self.quizzes.write().await;
        quizzes.remove(conversation_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::capitals_record;

    #[tokio::test]
    async fn load_returns_none_for_unknown_conversation() {
        let repo = InMemoryQuizRepository::new();

        let loaded = repo.load("missing").await.expect("load should work");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_overwrites_existing_record() {
        let repo = InMemoryQuizRepository::new();
        let first = capitals_record();
        let mut second = capitals_record();
        second.title = "Rivers".to_string();
        second.questions.truncate(1);

        repo.save("conv-1", first).await.expect("save first");
        repo.save("conv-1", second.clone()).await.expect("save second");

        let loaded = repo.load("conv-1").await.expect("load should work");
        assert_eq!(loaded, Some(second));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = InMemoryQuizRepository::new();
        repo.save("conv-1", capitals_record()).await.expect("save");

        repo.delete("conv-1").await.expect("first delete");
        repo.delete("conv-1").await.expect("second delete");

        assert!(repo.load("conv-1").await.expect("load").is_none());
    }

    #[tokio::test]
    async fn conversations_are_isolated() {
        let repo = InMemoryQuizRepository::new();
        repo.save("conv-1", capitals_record()).await.expect("save");

        assert!(repo.load("conv-2").await.expect("load").is_none());
    }
}
