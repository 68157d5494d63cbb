use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::widgets::{RESET_ACTION, SUBMIT_ACTION};

/// Question id → submitted option value.
pub type AnswerMap = HashMap<String, String>;

const ANSWERS_KEY: &str = "answers";
const ANSWER_FIELD_PREFIX: &str = "answers.";

/// Widget action decoded once at the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizAction {
    Submit { answers: AnswerMap },
    Reset,
    Unknown { action_type: String },
}

impl QuizAction {
    pub fn decode(action_type: &str, payload: &Value) -> Self {
        match action_type {
            SUBMIT_ACTION => QuizAction::Submit {
                answers: normalize_answers(payload),
            },
            RESET_ACTION => QuizAction::Reset,
            other => QuizAction::Unknown {
                action_type: other.to_string(),
            },
        }
    }

    pub fn action_type(&self) -> &str {
        match self {
            QuizAction::Submit { .. } => SUBMIT_ACTION,
            QuizAction::Reset => RESET_ACTION,
            QuizAction::Unknown { action_type } => action_type,
        }
    }
}

/// Collapse every accepted payload shape into one flat map:
/// `{"q1": "x"}`, `{"answers": {"q1": "x"}}` and form-field style
/// `{"answers.q1": "x"}`. A plain `q1` key beats `answers.q1`. Anything
/// else contributes nothing.
pub fn normalize_answers(payload: &Value) -> AnswerMap {
    let mut answers = AnswerMap::new();
    let Some(outer) = payload.as_object() else {
        return answers;
    };

    let source: &Map<String, Value> = match outer.get(ANSWERS_KEY) {
        Some(Value::Object(inner)) => inner,
        _ => outer,
    };

    for (key, value) in source {
        if key.starts_with(ANSWER_FIELD_PREFIX) {
            continue;
        }
        if let Some(answer) = scalar_answer(value) {
            answers.insert(key.clone(), answer);
        }
    }

    for (key, value) in source {
        let Some(question_id) = key.strip_prefix(ANSWER_FIELD_PREFIX) else {
            continue;
        };
        if let Some(answer) = scalar_answer(value) {
            answers.entry(question_id.to_string()).or_insert(answer);
        }
    }
    answers
}

fn scalar_answer(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
