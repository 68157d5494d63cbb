use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::domain::{Attachment, ThreadItem, UserMessageItem},
    repositories::FileRepository,
    services::generation::{ContentPart, ConversationTurn, TurnRole},
};

const PDF_MIME_TYPE: &str = "application/pdf";

/// Turns stored history into generation input, inlining attachment bytes
/// from the file store where the model can read them.
pub struct ThreadItemConverter {
    files: Arc<dyn FileRepository>,
}

impl ThreadItemConverter {
    pub fn new(files: Arc<dyn FileRepository>) -> Self {
        Self { files }
    }

    pub async fn to_generation_input(&self, items: &[ThreadItem]) -> AppResult<Vec<ConversationTurn>> {
        let mut turns = Vec::with_capacity(items.len());

        for item in items {
            match item {
                ThreadItem::UserMessage(message) => turns.push(self.user_turn(message).await?),
                ThreadItem::AssistantMessage(message) if !message.text.is_empty() => {
                    turns.push(ConversationTurn::assistant(message.text.as_str()))
                }
                ThreadItem::AssistantMessage(_) => {}
                // The model only needs to know a quiz was shown
                ThreadItem::Widget(widget) => {
                    if let Some(copy_text) = &widget.copy_text {
                        turns.push(ConversationTurn::assistant(copy_text.as_str()));
                    }
                }
            }
        }

        Ok(turns)
    }

    async fn user_turn(&self, message: &UserMessageItem) -> AppResult<ConversationTurn> {
        let mut content = Vec::with_capacity(message.attachments.len() + 1);
        if !message.text.trim().is_empty() {
            content.push(ContentPart::text(message.text.as_str()));
        }
        for attachment in &message.attachments {
            content.push(self.attachment_part(attachment).await?);
        }
        if content.is_empty() {
            content.push(ContentPart::text(message.text.as_str()));
        }

        Ok(ConversationTurn {
            role: TurnRole::User,
            content,
        })
    }

    async fn attachment_part(&self, attachment: &Attachment) -> AppResult<ContentPart> {
        log::info!(
            "Converting attachment {} ({}, {})",
            attachment.id,
            attachment.name,
            attachment.mime_type
        );

        let stored = self
            .files
            .load(&attachment.id)
            .await?
            .filter(|file| !file.is_empty());

        Ok(match stored {
            Some(file) if attachment.mime_type == PDF_MIME_TYPE => ContentPart::File {
                filename: attachment.name.clone(),
                data_url: file.data_url(),
            },
            Some(file) if attachment.mime_type.starts_with("image/") => ContentPart::Image {
                data_url: file.data_url(),
            },
            _ => ContentPart::text(format!(
                "[User attached a file: {} ({}). Please create a quiz based on this document.]",
                attachment.name, attachment.mime_type
            )),
        })
    }
}
