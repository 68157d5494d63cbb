use std::sync::Arc;

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use futures::{stream, StreamExt};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{ActionRequest, SendMessageRequest},
        response::{ConversationResponse, ThreadItemsResponse},
    },
    services::{chat_service::NewUserMessage, http_helpers::event_stream},
};

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[post("/api/conversations")]
pub async fn create_conversation(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let id = state.chat_service.create_conversation().await?;
    Ok(HttpResponse::Created().json(ConversationResponse { id }))
}

#[get("/api/conversations/{id}/items")]
pub async fn list_items(
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let conversation_id = id.into_inner();
    let items = state.chat_service.list_items(&conversation_id).await?;
    Ok(HttpResponse::Ok().json(ThreadItemsResponse {
        conversation_id,
        items,
    }))
}

#[post("/api/conversations/{id}/messages")]
pub async fn send_message(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    if request.is_blank() {
        return Err(AppError::ValidationError(
            "Message needs text or at least one attachment".to_string(),
        ));
    }

    let conversation_id = id.into_inner();
    state.chat_service.ensure_conversation(&conversation_id).await?;
    log::debug!(
        "[{}] Message to conversation {} with {} attachment(s)",
        get_request_id(&req).unwrap_or_default(),
        conversation_id,
        request.attachment_ids.len()
    );

    let events = state.chat_service.clone().respond(
        conversation_id,
        Some(NewUserMessage {
            text: request.text,
            attachment_ids: request.attachment_ids,
        }),
    );
    Ok(event_stream(events))
}

#[post("/api/conversations/{id}/actions")]
pub async fn send_action(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    id: web::Path<String>,
    request: web::Json<ActionRequest>,
) -> Result<HttpResponse, AppError> {
    let conversation_id = id.into_inner();
    state.chat_service.ensure_conversation(&conversation_id).await?;
    log::info!(
        "[{}] Action {} for conversation {}",
        get_request_id(&req).unwrap_or_default(),
        request.action_type,
        conversation_id
    );

    let events = state
        .chat_service
        .handle_action(&conversation_id, request.into_inner())
        .await?;
    Ok(event_stream(stream::iter(events).boxed()))
}
