use actix_web::{http::header, web::Bytes, HttpResponse};
use futures::{stream::BoxStream, StreamExt};

use crate::{errors::AppResult, models::domain::StreamEvent};

/// One server-sent-events frame carrying `event` as JSON.
pub fn sse_frame(event: &StreamEvent) -> AppResult<Bytes> {
    let json = serde_json::to_string(event)?;
    Ok(Bytes::from(format!("data: {}\n\n", json)))
}

/// Creates a `text/event-stream` response that forwards `events` as they arrive
pub fn event_stream(events: BoxStream<'static, StreamEvent>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(events.map(|event| sse_frame(&event)))
}
