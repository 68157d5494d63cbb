//! Quiz Taker widget: a fixed template projected from a [`QuizRecord`].
//!
//! The record is first flattened into plain template data (`title`,
//! `submitted`, `score`, `questions`), and the template only ever reads that
//! data. Grading decisions are already baked into the record; nothing here
//! computes them.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::models::domain::{QuizQuestion, QuizRecord};
use crate::widgets::widget_node::{ActionConfig, RadioOption, WidgetNode, WidgetRoot};

pub const SUBMIT_ACTION: &str = "quiz.submit";
pub const RESET_ACTION: &str = "quiz.reset";

const SUBMIT_LABEL: &str = "Submit answers";
const RESET_LABEL: &str = "Try again";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuizTemplateData {
    pub title: String,
    pub submitted: bool,
    pub score: String, // "" while unsubmitted
    pub questions: Vec<Map<String, Value>>,
}

impl From<&QuizRecord> for QuizTemplateData {
    fn from(record: &QuizRecord) -> Self {
        QuizTemplateData {
            title: record.title.clone(),
            submitted: record.submitted,
            score: record.score.clone().unwrap_or_default(),
            questions: record.questions.iter().map(question_fields).collect(),
        }
    }
}

fn question_fields(question: &QuizQuestion) -> Map<String, Value> {
    let options: Vec<Value> = question
        .options
        .iter()
        .map(|o| json!({ "label": o.label, "value": o.value, "disabled": o.disabled }))
        .collect();

    let mut fields = Map::new();
    fields.insert("id".into(), json!(question.id));
    fields.insert("prompt".into(), json!(question.prompt));
    fields.insert("options".into(), Value::Array(options));
    fields.insert("correctValue".into(), json!(question.correct_value));
    fields.insert("hint".into(), json!(question.hint));
    fields.insert("explanation".into(), json!(question.explanation));
    fields.insert("userAnswer".into(), json!(question.user_answer));
    fields.insert("isCorrect".into(), json!(question.is_correct));
    fields
}

/// Render the widget for a record.
pub fn render_quiz(record: &QuizRecord) -> WidgetRoot {
    build_quiz_widget(&QuizTemplateData::from(record))
}

pub fn build_quiz_widget(data: &QuizTemplateData) -> WidgetRoot {
    let mut header = vec![
        WidgetNode::Title {
            value: data.title.clone(),
        },
        WidgetNode::Spacer {},
    ];
    if data.submitted {
        header.push(WidgetNode::Badge {
            label: data.score.clone(),
            color: "info".to_string(),
        });
    }

    let mut form_children: Vec<WidgetNode> = data
        .questions
        .iter()
        .map(|q| question_block(q, data.submitted))
        .collect();
    form_children.push(WidgetNode::Button {
        label: SUBMIT_LABEL.to_string(),
        submit: true,
        on_click_action: None,
        disabled: data.submitted,
        style: "primary".to_string(),
    });

    let mut children = vec![
        WidgetNode::Row { children: header },
        WidgetNode::Divider {},
        WidgetNode::Form {
            on_submit_action: ActionConfig::new(SUBMIT_ACTION),
            children: form_children,
        },
    ];
    if data.submitted {
        children.push(WidgetNode::Button {
            label: RESET_LABEL.to_string(),
            submit: false,
            on_click_action: Some(ActionConfig::new(RESET_ACTION)),
            disabled: false,
            style: "secondary".to_string(),
        });
    }

    WidgetNode::Card { children }
}

fn question_block(question: &Map<String, Value>, submitted: bool) -> WidgetNode {
    let id = str_field(question, "id");
    let user_answer = str_field(question, "userAnswer");

    let options = question
        .get("options")
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(Value::as_object)
                .map(|o| RadioOption {
                    label: str_field(o, "label"),
                    value: str_field(o, "value"),
                    disabled: bool_field(o, "disabled"),
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let all_disabled = !options.is_empty() && options.iter().all(|o| o.disabled);

    let mut children = vec![
        WidgetNode::Text {
            value: str_field(question, "prompt"),
            weight: Some("semibold".to_string()),
            color: None,
        },
        WidgetNode::RadioGroup {
            name: format!("answers.{}", id),
            options,
            default_value: (!user_answer.is_empty()).then_some(user_answer),
            disabled: all_disabled,
        },
    ];

    if submitted {
        let feedback = if bool_field(question, "isCorrect") {
            WidgetNode::Text {
                value: format!("✅ Correct! {}", str_field(question, "explanation")),
                weight: None,
                color: Some("success".to_string()),
            }
        } else {
            WidgetNode::Text {
                value: format!("❌ Not quite. Hint: {}", str_field(question, "hint")),
                weight: None,
                color: Some("danger".to_string()),
            }
        };
        children.push(feedback);
    }

    WidgetNode::Col { gap: 2, children }
}

fn str_field(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn bool_field(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or(false)
}
