use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{FileRepository, InMemoryFileRepository, InMemoryQuizRepository, InMemoryThreadRepository},
    services::{
        chat_service::ChatService,
        generation::{GenerationEngine, OpenAiGenerationEngine},
    },
};

#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub file_repository: Arc<dyn FileRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate()?;
        let engine = Arc::new(OpenAiGenerationEngine::new(&config));
        log::info!("Using model {} at {}", config.openai_model, config.openai_api_base);

        Ok(Self::with_engine(config, engine))
    }

    /// Fresh in-memory stores around the given engine.
    pub fn with_engine(config: Config, engine: Arc<dyn GenerationEngine>) -> Self {
        let file_repository: Arc<dyn FileRepository> = Arc::new(InMemoryFileRepository::new());
        let chat_service = Arc::new(ChatService::new(
            Arc::new(InMemoryThreadRepository::new()),
            file_repository.clone(),
            Arc::new(InMemoryQuizRepository::new()),
            engine,
            config.history_limit,
        ));

        Self {
            chat_service,
            file_repository,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use secrecy::SecretString;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::test_config();
        config.openai_api_key = SecretString::from(String::new());

        assert!(matches!(AppState::new(config), Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_new_builds_isolated_stores() {
        let first = AppState::new(Config::test_config()).expect("state");
        let second = AppState::new(Config::test_config()).expect("state");

        let id = first.chat_service.create_conversation().await.expect("create");
        assert!(first.chat_service.ensure_conversation(&id).await.is_ok());
        assert!(second.chat_service.ensure_conversation(&id).await.is_err());
    }
}
