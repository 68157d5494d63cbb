use std::sync::Arc;

use actix_web::{get, http::header, post, route, web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::{
        domain::StoredFile,
        dto::{
            request::{default_content_type, InitiateUploadRequest},
            response::{UploadResponse, UploadTicketResponse},
        },
    },
};

/// Phase one of an upload: reserve an id and hand back where to send bytes.
#[post("/api/uploads")]
pub async fn initiate_upload(
    state: web::Data<Arc<AppState>>,
    request: web::Json<InitiateUploadRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let upload_id = Uuid::new_v4().to_string();
    state
        .file_repository
        .put(StoredFile::new(
            &upload_id,
            &request.filename,
            &request.content_type,
            vec![],
        ))
        .await?;

    Ok(HttpResponse::Ok().json(UploadTicketResponse {
        upload_url: format!("{}/api/uploads/{}", state.config.public_url, upload_id),
        upload_id,
        filename: request.filename,
        content_type: request.content_type,
    }))
}

/// Phase two: the raw body becomes the file's content.
#[route("/api/uploads/{id}", method = "PUT", method = "POST")]
pub async fn upload_file(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let upload_id = id.into_inner();
    if body.len() > state.config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "Upload is {} bytes; the limit is {}",
            body.len(),
            state.config.max_upload_bytes
        )));
    }

    let reserved = state.file_repository.load(&upload_id).await?;
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| reserved.as_ref().map(|file| file.content_type.clone()))
        .unwrap_or_else(default_content_type);
    let filename = reserved
        .map(|file| file.filename)
        .unwrap_or_else(|| format!("upload_{}", upload_id));

    let file = StoredFile::new(&upload_id, &filename, &content_type, body.to_vec());
    let response = UploadResponse::from(&file);
    state.file_repository.put(file).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/files/{id}")]
pub async fn get_file(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let file = state
        .file_repository
        .load(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("File '{}' not found", id)))?;

    Ok(HttpResponse::Ok()
        .content_type(file.content_type.as_str())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", file.filename),
        ))
        .body(file.data))
}
