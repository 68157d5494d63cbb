pub mod quiz_prompt;
pub mod quiz_text;
