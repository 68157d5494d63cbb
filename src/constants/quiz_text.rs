//! User-facing assistant messages for quiz transitions.

use crate::services::grading_service::ScoreSummary;

pub const RESET_MESSAGE: &str = "Quiz reset! Give it another try. 💪";

pub const EMPTY_QUIZ_MESSAGE: &str = "There were no questions to grade.";

pub fn quiz_ready_message(title: &str) -> String {
    format!(
        "Here's your quiz on {}! Answer all the questions and click 'Submit answers' when you're ready.",
        title
    )
}

pub fn quiz_copy_text(title: &str) -> String {
    format!("Quiz: {}", title)
}

/// Follow-up message after grading, banded by the fraction answered correctly.
pub fn feedback_message(summary: &ScoreSummary) -> String {
    let Some(ratio) = summary.ratio() else {
        return EMPTY_QUIZ_MESSAGE.to_string();
    };

    if summary.is_perfect() {
        format!(
            "🎉 Perfect score! You got all {} questions correct!",
            summary.total
        )
    } else if ratio >= 0.7 {
        format!("Great job! You scored {}. Keep it up!", summary)
    } else if ratio >= 0.5 {
        format!(
            "Not bad! You scored {}. Review the hints for the ones you missed.",
            summary
        )
    } else {
        format!("You scored {}. Check the hints and try again!", summary)
    }
}
