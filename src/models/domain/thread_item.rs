use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::widgets::WidgetRoot;

/// Ids look like `msg_3f2a…` / `wdg_…`, unique per process.
pub fn new_item_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub mime_type: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserMessageItem {
    pub id: String,
    pub conversation_id: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl UserMessageItem {
    pub fn new(conversation_id: &str, text: &str, attachments: Vec<Attachment>) -> Self {
        UserMessageItem {
            id: new_item_id("msg"),
            conversation_id: conversation_id.to_string(),
            created_at: Utc::now(),
            text: text.to_string(),
            attachments,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AssistantMessageItem {
    pub id: String,
    pub conversation_id: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
}

impl AssistantMessageItem {
    pub fn new(conversation_id: &str, text: &str) -> Self {
        AssistantMessageItem {
            id: new_item_id("msg"),
            conversation_id: conversation_id.to_string(),
            created_at: Utc::now(),
            text: text.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct WidgetItem {
    pub id: String,
    pub conversation_id: String,
    pub created_at: DateTime<Utc>,
    pub widget: WidgetRoot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_text: Option<String>,
}

impl WidgetItem {
    pub fn new(conversation_id: &str, widget: WidgetRoot, copy_text: Option<String>) -> Self {
        WidgetItem {
            id: new_item_id("wdg"),
            conversation_id: conversation_id.to_string(),
            created_at: Utc::now(),
            widget,
            copy_text,
        }
    }

    /// Same item (id, timestamp, copy text) showing a different tree.
    pub fn with_widget(&self, widget: WidgetRoot) -> Self {
        WidgetItem {
            widget,
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThreadItem {
    UserMessage(UserMessageItem),
    AssistantMessage(AssistantMessageItem),
    Widget(WidgetItem),
}

impl ThreadItem {
    pub fn id(&self) -> &str {
        match self {
            ThreadItem::UserMessage(item) => &item.id,
            ThreadItem::AssistantMessage(item) => &item.id,
            ThreadItem::Widget(item) => &item.id,
        }
    }

    pub fn conversation_id(&self) -> &str {
        match self {
            ThreadItem::UserMessage(item) => &item.conversation_id,
            ThreadItem::AssistantMessage(item) => &item.conversation_id,
            ThreadItem::Widget(item) => &item.conversation_id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            ThreadItem::UserMessage(item) => item.created_at,
            ThreadItem::AssistantMessage(item) => item.created_at,
            ThreadItem::Widget(item) => item.created_at,
        }
    }
}
