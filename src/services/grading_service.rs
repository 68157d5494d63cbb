use crate::models::domain::{QuizOption, QuizQuestion, QuizRecord};
use crate::models::dto::quiz_action::AnswerMap;

/// Correct answers out of total questions for a graded record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreSummary {
    pub correct: usize,
    pub total: usize,
}

impl ScoreSummary {
    /// `None` when there were no questions to grade.
    pub fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.correct as f64 / self.total as f64)
    }

    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

impl std::fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}

pub struct GradingService;

impl GradingService {
    /// Grade every question against `answers`, keyed by question id.
    ///
    /// Matching is exact string equality with `correct_value`. A question
    /// with no entry in `answers` counts as unanswered. Every option ends up
    /// disabled whether or not its question was answered.
    pub fn grade(record: &QuizRecord, answers: &AnswerMap) -> QuizRecord {
        log::debug!(
            "Grading '{}': {} answers for {} questions",
            record.title,
            answers.len(),
            record.questions.len()
        );

        let questions: Vec<QuizQuestion> = record
            .questions
            .iter()
            .map(|question| {
                let user_answer = answers.get(&question.id).cloned().unwrap_or_default();
                let is_correct = user_answer == question.correct_value;
                QuizQuestion {
                    user_answer,
                    is_correct,
                    options: with_disabled(&question.options, true),
                    ..question.clone()
                }
            })
            .collect();

        let summary = ScoreSummary {
            correct: questions.iter().filter(|q| q.is_correct).count(),
            total: questions.len(),
        };

        QuizRecord {
            title: record.title.clone(),
            submitted: true,
            score: Some(summary.to_string()),
            questions,
        }
    }

    /// Back to the unsubmitted state with the same content.
    pub fn reset(record: &QuizRecord) -> QuizRecord {
        let questions = record
            .questions
            .iter()
            .map(|question| QuizQuestion {
                user_answer: String::new(),
                is_correct: false,
                options: with_disabled(&question.options, false),
                ..question.clone()
            })
            .collect();

        QuizRecord {
            title: record.title.clone(),
            submitted: false,
            score: None,
            questions,
        }
    }

    pub fn summarize(record: &QuizRecord) -> ScoreSummary {
        ScoreSummary {
            correct: record.correct_count(),
            total: record.questions.len(),
        }
    }
}

fn with_disabled(options: &[QuizOption], disabled: bool) -> Vec<QuizOption> {
    options
        .iter()
        .map(|option| QuizOption {
            disabled,
            ..option.clone()
        })
        .collect()
}
