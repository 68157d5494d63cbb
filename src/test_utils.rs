use crate::models::domain::{QuizOption, QuizQuestion, QuizRecord};

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use crate::models::domain::WidgetItem;
    use crate::models::dto::quiz_action::AnswerMap;
    use crate::widgets::render_quiz;

    /// Two-option question whose correct value is `correct`
    pub fn question(id: &str, correct: &str) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            prompt: format!("Question {}", id),
            options: vec![
                QuizOption::new(&correct.to_uppercase(), correct),
                QuizOption::new("Other", "other"),
            ],
            correct_value: correct.to_string(),
            hint: format!("Hint for {}", id),
            explanation: format!("Explanation for {}", id),
            user_answer: String::new(),
            is_correct: false,
        }
    }

    /// "Capitals" quiz: q1 (paris/rome, correct paris), q2 (4/5, correct 4)
    pub fn capitals_record() -> QuizRecord {
        QuizRecord::new(
            "Capitals",
            vec![
                QuizQuestion {
                    id: "q1".to_string(),
                    prompt: "What is the capital of France?".to_string(),
                    options: vec![QuizOption::new("Paris", "paris"), QuizOption::new("Rome", "rome")],
                    correct_value: "paris".to_string(),
                    hint: "Think of the Eiffel Tower".to_string(),
                    explanation: "Paris has been the capital of France for centuries".to_string(),
                    user_answer: String::new(),
                    is_correct: false,
                },
                QuizQuestion {
                    id: "q2".to_string(),
                    prompt: "What is 2 + 2?".to_string(),
                    options: vec![QuizOption::new("4", "4"), QuizOption::new("5", "5")],
                    correct_value: "4".to_string(),
                    hint: "Count on your fingers".to_string(),
                    explanation: "Two pairs make four".to_string(),
                    user_answer: String::new(),
                    is_correct: false,
                },
            ],
        )
    }

    pub fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect()
    }

    /// Widget item showing `record` in `conversation_id`
    pub fn quiz_widget_item(conversation_id: &str, record: &QuizRecord) -> WidgetItem {
        WidgetItem::new(
            conversation_id,
            render_quiz(record),
            Some(format!("Quiz: {}", record.title)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_capitals_record() {
        let record = capitals_record();
        assert_eq!(record.title, "Capitals");
        assert_eq!(record.questions.len(), 2);
        assert!(record.questions.iter().all(|q| q.has_valid_answer_key()));
        assert!(record.is_consistent());
    }

    #[test]
    fn test_fixtures_question() {
        let q = question("q7", "x");
        assert_eq!(q.id, "q7");
        assert!(q.has_valid_answer_key());
    }

    #[test]
    fn test_fixtures_answers() {
        let map = answers(&[("q1", "a"), ("q2", "b")]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["q1"], "a");
    }
}
