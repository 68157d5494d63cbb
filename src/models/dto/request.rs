use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::errors::AppResult;
use crate::models::domain::{QuizOption, QuizQuestion};

/// A single answer option for a quiz question.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate, JsonSchema)]
pub struct QuizOptionSpec {
    /// The display text for this option
    pub label: String,
    /// The value/key for this option
    pub value: String,
}

/// A single quiz question with multiple choice options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionSpec {
    /// Unique identifier like q1, q2, q3
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    /// The question text
    pub prompt: String,
    /// The answer options
    pub options: Vec<QuizOptionSpec>,
    /// The value of the correct option
    pub correct_value: String,
    /// Hint shown when the answer is wrong
    pub hint: String,
    /// Explanation shown when the answer is correct, explaining why it's right
    pub explanation: String,
}

impl From<QuizQuestionSpec> for QuizQuestion {
    fn from(spec: QuizQuestionSpec) -> Self {
        QuizQuestion {
            id: spec.id,
            prompt: spec.prompt,
            options: spec
                .options
                .into_iter()
                .map(|o| QuizOption::new(&o.label, &o.value))
                .collect(),
            correct_value: spec.correct_value,
            hint: spec.hint,
            explanation: spec.explanation,
            user_answer: String::new(),
            is_correct: false,
        }
    }
}

/// Arguments of the `show_quiz` tool call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ShowQuizArgs {
    /// The title of the quiz
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// The quiz questions, in display order
    #[validate(nested)]
    pub questions: Vec<QuizQuestionSpec>,
}

impl ShowQuizArgs {
    /// Parse and validate raw tool-call arguments.
    pub fn parse(arguments: &str) -> AppResult<Self> {
        let args: ShowQuizArgs = serde_json::from_str(arguments)?;
        args.validate()?;
        Ok(args)
    }

    /// JSON schema for the tool's `parameters` field.
    pub fn parameters_schema() -> AppResult<Value> {
        let mut schema = serde_json::to_value(schemars::schema_for!(ShowQuizArgs))?;
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
        }
        Ok(schema)
    }

    pub fn into_parts(self) -> (String, Vec<QuizQuestion>) {
        let questions = self.questions.into_iter().map(QuizQuestion::from).collect();
        (self.title, questions)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(max = 20000))]
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub attachment_ids: Vec<String>,
}

impl SendMessageRequest {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty() && self.attachment_ids.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionRequest {
    #[serde(rename = "type")]
    pub action_type: String,

    #[serde(default)]
    pub payload: Value,

    /// Id of the widget item the action was posted from
    #[serde(default)]
    pub item_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InitiateUploadRequest {
    #[validate(length(min = 1, max = 255))]
    #[serde(default = "default_filename")]
    pub filename: String,

    #[validate(length(min = 1, max = 255))]
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_filename() -> String {
    "unknown".to_string()
}

pub fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    const CAPITALS_ARGS: &str = r#"{
        "title": "Capitals",
        "questions": [{
            "id": "q1",
            "prompt": "What is the capital of France?",
            "options": [{"label": "Paris", "value": "paris"}, {"label": "Rome", "value": "rome"}],
            "correctValue": "paris",
            "hint": "Think of the Eiffel Tower",
            "explanation": "Paris is the capital of France"
        }]
    }"#;

    #[test]
    fn parse_accepts_valid_tool_arguments() {
        let args = ShowQuizArgs::parse(CAPITALS_ARGS).expect("arguments should parse");

        assert_eq!(args.title, "Capitals");
        assert_eq!(args.questions.len(), 1);
        assert_eq!(args.questions[0].correct_value, "paris");
    }

    #[test]
    fn parse_rejects_empty_title() {
        let raw = CAPITALS_ARGS.replace("\"Capitals\"", "\"\"");
        let result = ShowQuizArgs::parse(&raw);

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn parse_rejects_question_without_id() {
        let raw = CAPITALS_ARGS.replace("\"id\": \"q1\"", "\"id\": \"\"");
        assert!(ShowQuizArgs::parse(&raw).is_err());
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let result = ShowQuizArgs::parse("{\"title\": \"Capitals\", \"questions\": [");
        assert!(matches!(result, Err(AppError::InternalError(_))));
    }

    #[test]
    fn into_parts_builds_unanswered_questions() {
        let (title, questions) = ShowQuizArgs::parse(CAPITALS_ARGS)
            .expect("arguments should parse")
            .into_parts();

        assert_eq!(title, "Capitals");
        assert_eq!(questions[0].user_answer, "");
        assert!(!questions[0].is_correct);
        assert!(questions[0].options.iter().all(|o| !o.disabled));
    }

    #[test]
    fn parameters_schema_describes_camel_case_fields() {
        let schema = ShowQuizArgs::parameters_schema().expect("schema should build");
        let text = schema.to_string();

        assert!(schema.get("$schema").is_none());
        assert_eq!(schema["type"], "object");
        assert!(text.contains("correctValue"));
        assert!(text.contains("The value of the correct option"));
    }

    #[test]
    fn blank_message_detection() {
        let blank: SendMessageRequest =
            serde_json::from_str(r#"{"text": "   "}"#).expect("request should parse");
        assert!(blank.is_blank());

        let with_file: SendMessageRequest =
            serde_json::from_str(r#"{"attachment_ids": ["f1"]}"#).expect("request should parse");
        assert!(!with_file.is_blank());
    }
}
