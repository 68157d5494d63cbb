use serde::Serialize;

use crate::models::domain::{StoredFile, ThreadItem};

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ThreadItemsResponse {
    pub conversation_id: String,
    pub items: Vec<ThreadItem>,
}

#[derive(Debug, Serialize)]
pub struct UploadTicketResponse {
    pub upload_id: String,
    pub upload_url: String,
    pub filename: String,
    pub content_type: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: String,
    pub size: usize,
    pub content_type: String,
}

impl From<&StoredFile> for UploadResponse {
    fn from(file: &StoredFile) -> Self {
        UploadResponse {
            id: file.id.clone(),
            size: file.size,
            content_type: file.content_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_from_stored_file() {
        let file = StoredFile::new("up-1", "upload_up-1", "application/pdf", vec![0; 10]);
        let response = UploadResponse::from(&file);

        assert_eq!(response.id, "up-1");
        assert_eq!(response.size, 10);
        assert_eq!(response.content_type, "application/pdf");
    }
}
