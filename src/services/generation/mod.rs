pub mod openai_engine;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;

use crate::{errors::AppResult, models::dto::request::ShowQuizArgs};

pub use openai_engine::OpenAiGenerationEngine;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentPart {
    Text { text: String },
    Image { data_url: String },
    File { filename: String, data_url: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }
}

/// One prior turn of the conversation, as the model should see it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: Vec<ContentPart>,
}

impl ConversationTurn {
    pub fn assistant(text: impl Into<String>) -> Self {
        ConversationTurn {
            role: TurnRole::Assistant,
            content: vec![ContentPart::text(text)],
        }
    }

    /// Concatenated text parts; non-text parts are skipped.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GenerationEvent {
    TextDelta(String),
    ShowQuiz(ShowQuizArgs),
}

pub type GenerationStream = BoxStream<'static, AppResult<GenerationEvent>>;

/// Produces either streamed text or a `show_quiz` tool call from the
/// conversation so far.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    async fn generate(&self, input: Vec<ConversationTurn>) -> AppResult<GenerationStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_joins_text_parts_only() {
        let turn = ConversationTurn {
            role: TurnRole::User,
            content: vec![
                ContentPart::text("Make a quiz"),
                ContentPart::Image {
                    data_url: "data:image/png;base64,AA==".to_string(),
                },
                ContentPart::text("about capitals"),
            ],
        };

        assert_eq!(turn.plain_text(), "Make a quiz\nabout capitals");
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(TurnRole::Assistant).expect("serialize"),
            "assistant"
        );
    }
}
