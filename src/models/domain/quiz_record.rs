use serde::{Deserialize, Serialize};

/// One selectable answer. Only `disabled` ever changes after authoring.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizOption {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
}

impl QuizOption {
    pub fn new(label: &str, value: &str) -> Self {
        QuizOption {
            label: label.to_string(),
            value: value.to_string(),
            disabled: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String, // caller assigned, e.g. "q1"
    pub prompt: String,
    pub options: Vec<QuizOption>,
    pub correct_value: String, // should match exactly one option value
    pub hint: String,          // shown when the answer is wrong
    pub explanation: String,   // shown when the answer is right
    #[serde(default)]
    pub user_answer: String, // empty means unanswered
    #[serde(default)]
    pub is_correct: bool,
}

impl QuizQuestion {
    pub fn has_valid_answer_key(&self) -> bool {
        self.options
            .iter()
            .filter(|o| o.value == self.correct_value)
            .count()
            == 1
    }
}

/// Authoritative state of the quiz shown in one conversation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizRecord {
    pub title: String,
    pub submitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>, // "correct/total", only once submitted
    pub questions: Vec<QuizQuestion>,
}

impl QuizRecord {
    /// Fresh, ungraded record. Answer state on the incoming questions is
    /// discarded so the record always starts in the unsubmitted state.
    pub fn new(title: &str, questions: Vec<QuizQuestion>) -> Self {
        let questions = questions
            .into_iter()
            .map(|q| QuizQuestion {
                user_answer: String::new(),
                is_correct: false,
                options: q
                    .options
                    .into_iter()
                    .map(|o| QuizOption {
                        disabled: false,
                        ..o
                    })
                    .collect(),
                ..q
            })
            .collect();

        QuizRecord {
            title: title.to_string(),
            submitted: false,
            score: None,
            questions,
        }
    }

    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct).count()
    }

    pub fn question(&self, id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Checks the submitted/unsubmitted state invariants.
    pub fn is_consistent(&self) -> bool {
        let all_options = || self.questions.iter().flat_map(|q| q.options.iter());

        if self.submitted {
            let expected = format!("{}/{}", self.correct_count(), self.questions.len());
            self.score.as_deref() == Some(expected.as_str()) && all_options().all(|o| o.disabled)
        } else {
            self.score.is_none()
                && self
                    .questions
                    .iter()
                    .all(|q| q.user_answer.is_empty() && !q.is_correct)
                && all_options().all(|o| !o.disabled)
        }
    }
}
