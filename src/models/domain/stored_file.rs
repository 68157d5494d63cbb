use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Raw bytes of an uploaded attachment plus the metadata needed to serve it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub size: usize,
    pub created_at: DateTime<Utc>,
}

impl StoredFile {
    pub fn new(id: &str, filename: &str, content_type: &str, data: Vec<u8>) -> Self {
        StoredFile {
            id: id.to_string(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size: data.len(),
            data,
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `data:` URL suitable for inline model input.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }
}
