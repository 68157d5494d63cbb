use std::sync::Arc;

use futures::{stream::BoxStream, StreamExt};
use tokio::sync::mpsc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{AssistantMessageItem, Attachment, StreamEvent, ThreadItem, UserMessageItem},
        dto::{quiz_action::QuizAction, request::ActionRequest},
    },
    repositories::{FileRepository, QuizRepository, ThreadRepository},
    services::{
        generation::{GenerationEngine, GenerationEvent},
        quiz_session_service::QuizSessionService,
        streaming::channel_stream,
        thread_item_converter::ThreadItemConverter,
    },
};

#[derive(Clone, Debug, Default)]
pub struct NewUserMessage {
    pub text: String,
    pub attachment_ids: Vec<String>,
}

/// Drives one conversation turn at a time: history in, generation, quiz
/// transitions, stream events out. Every emitted item is recorded in the
/// thread before it is sent.
pub struct ChatService {
    threads: Arc<dyn ThreadRepository>,
    files: Arc<dyn FileRepository>,
    sessions: QuizSessionService,
    engine: Arc<dyn GenerationEngine>,
    converter: ThreadItemConverter,
    history_limit: usize,
}

impl ChatService {
    pub fn new(
        threads: Arc<dyn ThreadRepository>,
        files: Arc<dyn FileRepository>,
        quizzes: Arc<dyn QuizRepository>,
        engine: Arc<dyn GenerationEngine>,
        history_limit: usize,
    ) -> Self {
        Self {
            converter: ThreadItemConverter::new(files.clone()),
            sessions: QuizSessionService::new(quizzes),
            threads,
            files,
            engine,
            history_limit,
        }
    }

    pub async fn create_conversation(&self) -> AppResult<String> {
        self.threads.create_thread().await
    }

    pub async fn ensure_conversation(&self, conversation_id: &str) -> AppResult<()> {
        if self.threads.thread_exists(conversation_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Conversation '{}' not found",
                conversation_id
            )))
        }
    }

    pub async fn list_items(&self, conversation_id: &str) -> AppResult<Vec<ThreadItem>> {
        self.threads.list_items(conversation_id).await
    }

    /// Run a response turn in the background and stream its events.
    ///
    /// The turn stops early when the returned stream is dropped. A failure
    /// becomes a single `error` event at the end of the stream.
    pub fn respond(
        self: Arc<Self>,
        conversation_id: String,
        message: Option<NewUserMessage>,
    ) -> BoxStream<'static, StreamEvent> {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let sink = EventSink {
                threads: self.threads.clone(),
                tx,
            };

            if let Err(err) = self.run_turn(&conversation_id, message, &sink).await {
                if sink.tx.is_closed() {
                    log::info!("Client left conversation {} mid-response", conversation_id);
                    return;
                }
                log::error!("Response in conversation {} failed: {}", conversation_id, err);
                let _ = sink
                    .tx
                    .send(StreamEvent::Error {
                        message: err.to_string(),
                    })
                    .await;
            }
        });

        channel_stream(rx)
    }

    /// Decode a widget action, run it against the stored quiz and record
    /// the resulting events.
    pub async fn handle_action(
        &self,
        conversation_id: &str,
        request: ActionRequest,
    ) -> AppResult<Vec<StreamEvent>> {
        let action = QuizAction::decode(&request.action_type, &request.payload);
        log::debug!(
            "Action {} in conversation {} from item {:?}",
            action.action_type(),
            conversation_id,
            request.item_id
        );

        let sender = match &request.item_id {
            Some(item_id) => match self.threads.load_item(conversation_id, item_id).await? {
                Some(ThreadItem::Widget(widget)) => Some(widget),
                _ => None,
            },
            None => None,
        };

        let events = self
            .sessions
            .handle_action(conversation_id, &action, sender.as_ref())
            .await;
        for event in &events {
            record_event(self.threads.as_ref(), event).await?;
        }
        Ok(events)
    }

    async fn run_turn(
        &self,
        conversation_id: &str,
        message: Option<NewUserMessage>,
        sink: &EventSink,
    ) -> AppResult<()> {
        if let Some(message) = message {
            let item = self.user_item(conversation_id, message).await?;
            sink.emit(StreamEvent::ItemDone {
                item: ThreadItem::UserMessage(item),
            })
            .await?;
        }

        let history = self
            .threads
            .load_recent_items(conversation_id, self.history_limit)
            .await?;
        let input = self.converter.to_generation_input(&history).await?;
        let mut generation = self.engine.generate(input).await?;

        let mut assistant: Option<AssistantMessageItem> = None;
        while let Some(event) = generation.next().await {
            match event? {
                GenerationEvent::TextDelta(delta) => {
                    let mut item = match assistant.take() {
                        Some(item) => item,
                        None => {
                            let item = AssistantMessageItem::new(conversation_id, "");
                            sink.emit(StreamEvent::ItemAdded {
                                item: ThreadItem::AssistantMessage(item.clone()),
                            })
                            .await?;
                            item
                        }
                    };
                    item.text.push_str(&delta);
                    sink.emit(StreamEvent::TextDelta {
                        item_id: item.id.clone(),
                        delta,
                    })
                    .await?;
                    assistant = Some(item);
                }
                GenerationEvent::ShowQuiz(args) => {
                    if let Some(item) = assistant.take() {
                        sink.emit(StreamEvent::ItemDone {
                            item: ThreadItem::AssistantMessage(item),
                        })
                        .await?;
                    }

                    let (title, questions) = args.into_parts();
                    for event in self.sessions.author(conversation_id, &title, questions).await? {
                        sink.emit(event).await?;
                    }
                    // The quiz is the last output of the turn
                    return Ok(());
                }
            }
        }

        if let Some(item) = assistant {
            sink.emit(StreamEvent::ItemDone {
                item: ThreadItem::AssistantMessage(item),
            })
            .await?;
        }
        Ok(())
    }

    async fn user_item(
        &self,
        conversation_id: &str,
        message: NewUserMessage,
    ) -> AppResult<UserMessageItem> {
        let mut attachments = Vec::with_capacity(message.attachment_ids.len());
        for id in &message.attachment_ids {
            match self.files.load(id).await? {
                Some(file) => attachments.push(Attachment {
                    id: file.id,
                    name: file.filename,
                    mime_type: file.content_type,
                }),
                None => log::warn!(
                    "Skipping unknown attachment {} in conversation {}",
                    id,
                    conversation_id
                ),
            }
        }

        Ok(UserMessageItem::new(conversation_id, &message.text, attachments))
    }
}

struct EventSink {
    threads: Arc<dyn ThreadRepository>,
    tx: mpsc::Sender<StreamEvent>,
}

impl EventSink {
    async fn emit(&self, event: StreamEvent) -> AppResult<()> {
        record_event(self.threads.as_ref(), &event).await?;
        self.tx
            .send(event)
            .await
            .map_err(|_| AppError::InternalError("response stream closed".to_string()))
    }
}

async fn record_event(threads: &dyn ThreadRepository, event: &StreamEvent) -> AppResult<()> {
    match event {
        StreamEvent::ItemDone { item } => threads.append_item(item.clone()).await,
        StreamEvent::ItemReplaced { item } => threads.replace_item(item.clone()).await,
        _ => Ok(()),
    }
}
