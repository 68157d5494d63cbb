use serde::{Deserialize, Serialize};

use crate::models::domain::thread_item::ThreadItem;

/// One unit of a streamed response, serialized onto the SSE body as-is.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "item.added")]
    ItemAdded { item: ThreadItem },
    #[serde(rename = "text.delta")]
    TextDelta { item_id: String, delta: String },
    #[serde(rename = "item.done")]
    ItemDone { item: ThreadItem },
    #[serde(rename = "item.replaced")]
    ItemReplaced { item: ThreadItem },
    #[serde(rename = "error")]
    Error { message: String },
}

impl StreamEvent {
    /// Item the history store must persist, if any.
    pub fn persisted_item(&self) -> Option<&ThreadItem> {
        match self {
            StreamEvent::ItemDone { item } | StreamEvent::ItemReplaced { item } => Some(item),
            _ => None,
        }
    }
}
