use std::sync::Arc;

use thiserror::Error;

use crate::{
    constants::quiz_text::{feedback_message, quiz_copy_text, quiz_ready_message, RESET_MESSAGE},
    errors::{AppError, AppResult},
    models::{
        domain::{AssistantMessageItem, QuizQuestion, QuizRecord, StreamEvent, ThreadItem, WidgetItem},
        dto::quiz_action::{AnswerMap, QuizAction},
    },
    repositories::QuizRepository,
    services::grading_service::GradingService,
    widgets::render_quiz,
};

/// Why an action produced no events.
#[derive(Debug, Error)]
enum ActionDropped {
    #[error("action has no source widget reference")]
    MissingWidgetReference,
    #[error("no quiz stored for this conversation")]
    MissingRecord,
    #[error("unrecognized action type '{0}'")]
    UnknownActionType(String),
    #[error(transparent)]
    Repository(#[from] AppError),
}

enum Transition<'a> {
    Grade(&'a AnswerMap),
    Reset,
}

/// Per-conversation quiz state machine. The repository is the only source
/// of quiz state; rendered widgets are never read back.
pub struct QuizSessionService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizSessionService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    /// Store a fresh quiz (replacing any earlier one) and emit its widget
    /// followed by an invitation to answer.
    pub async fn author(
        &self,
        conversation_id: &str,
        title: &str,
        questions: Vec<QuizQuestion>,
    ) -> AppResult<Vec<StreamEvent>> {
        let record = QuizRecord::new(title, questions);
        log::info!(
            "[show_quiz] {} with {} questions for conversation {}",
            title,
            record.questions.len(),
            conversation_id
        );

        self.repository.save(conversation_id, record.clone()).await?;

        let widget = WidgetItem::new(
            conversation_id,
            render_quiz(&record),
            Some(quiz_copy_text(title)),
        );
        let follow_up = AssistantMessageItem::new(conversation_id, &quiz_ready_message(title));

        Ok(vec![
            StreamEvent::ItemDone {
                item: ThreadItem::Widget(widget),
            },
            StreamEvent::ItemDone {
                item: ThreadItem::AssistantMessage(follow_up),
            },
        ])
    }

    /// Apply a widget action. Failures are logged and yield no events.
    pub async fn handle_action(
        &self,
        conversation_id: &str,
        action: &QuizAction,
        sender: Option<&WidgetItem>,
    ) -> Vec<StreamEvent> {
        match self.apply_action(conversation_id, action, sender).await {
            Ok(events) => events,
            Err(ActionDropped::UnknownActionType(action_type)) => {
                log::info!(
                    "Ignoring unknown action '{}' in conversation {}",
                    action_type,
                    conversation_id
                );
                vec![]
            }
            Err(ActionDropped::MissingWidgetReference) => {
                log::warn!(
                    "{} in conversation {} has no widget reference",
                    action.action_type(),
                    conversation_id
                );
                vec![]
            }
            Err(err) => {
                log::error!(
                    "Dropping {} in conversation {}: {}",
                    action.action_type(),
                    conversation_id,
                    err
                );
                vec![]
            }
        }
    }

    async fn apply_action(
        &self,
        conversation_id: &str,
        action: &QuizAction,
        sender: Option<&WidgetItem>,
    ) -> Result<Vec<StreamEvent>, ActionDropped> {
        let transition = match action {
            QuizAction::Submit { answers } => Transition::Grade(answers),
            QuizAction::Reset => Transition::Reset,
            QuizAction::Unknown { action_type } => {
                return Err(ActionDropped::UnknownActionType(action_type.clone()))
            }
        };

        let sender = sender.ok_or(ActionDropped::MissingWidgetReference)?;
        let record = self
            .repository
            .load(conversation_id)
            .await?
            .ok_or(ActionDropped::MissingRecord)?;

        let (next, message) = match transition {
            Transition::Grade(answers) => {
                let graded = GradingService::grade(&record, answers);
                let summary = GradingService::summarize(&graded);
                log::info!(
                    "Graded '{}' in conversation {}: {}",
                    graded.title,
                    conversation_id,
                    summary
                );
                (graded, feedback_message(&summary))
            }
            Transition::Reset => {
                log::info!("Reset '{}' in conversation {}", record.title, conversation_id);
                (GradingService::reset(&record), RESET_MESSAGE.to_string())
            }
        };

        self.repository.save(conversation_id, next.clone()).await?;

        let replaced = sender.with_widget(render_quiz(&next));
        let follow_up = AssistantMessageItem::new(conversation_id, &message);

        Ok(vec![
            StreamEvent::ItemReplaced {
                item: ThreadItem::Widget(replaced),
            },
            StreamEvent::ItemDone {
                item: ThreadItem::AssistantMessage(follow_up),
            },
        ])
    }
}
